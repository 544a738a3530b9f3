use ff_engine::{Dice, Roller, ScriptedRolls};

#[test]
fn rolls_stay_in_uniform_range() {
    let mut dice = Dice::from_seed(7);
    for _ in 0..2000 {
        let one = dice.roll(1, 6);
        assert!((1..=6).contains(&one));
        let two = dice.roll(2, 6);
        assert!((2..=12).contains(&two));
    }
}

#[test]
fn two_dice_can_hit_both_extremes() {
    // A single draw over [2, 12] reaches the ends far more often than 2d6 summed.
    let mut dice = Dice::from_seed(99);
    let rolls: Vec<i32> = (0..500).map(|_| dice.roll(2, 6)).collect();
    assert!(rolls.contains(&2));
    assert!(rolls.contains(&12));
}

#[test]
fn same_seed_same_sequence() {
    let mut a = Dice::from_seed(2025);
    let mut b = Dice::from_seed(2025);
    let xs: Vec<i32> = (0..20).map(|_| a.roll(1, 6)).collect();
    let ys: Vec<i32> = (0..20).map(|_| b.roll(1, 6)).collect();
    assert_eq!(xs, ys);
}

#[test]
fn zero_sided_dice_collapse_to_count() {
    let mut dice = Dice::from_seed(1);
    assert_eq!(dice.roll(3, 0), 3);
}

#[test]
fn scripted_rolls_replay_and_cycle() {
    let mut dice = ScriptedRolls::new(vec![3, 4, 5]);
    let got: Vec<i32> = (0..5).map(|_| dice.roll(1, 6)).collect();
    assert_eq!(got, vec![3, 4, 5, 3, 4]);
    assert_eq!(dice.consumed(), 5);
}

#[test]
fn empty_script_rolls_minimum() {
    let mut dice = ScriptedRolls::default();
    assert_eq!(dice.roll(2, 6), 2);
    assert_eq!(dice.roll(1, 6), 1);
}

#[test]
fn huge_dice_counts_saturate_instead_of_wrapping() {
    let mut dice = Dice::from_seed(5);
    assert_eq!(dice.roll(3_000_000_000, 6), i32::MAX);
    let big = dice.roll(1_000_000_000, 6);
    assert!(big >= 1_000_000_000, "{}", big);
    assert_eq!(ScriptedRolls::default().roll(3_000_000_000, 6), i32::MAX);
}
