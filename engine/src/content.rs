pub fn builtin_rules() -> &'static str {
    include_str!("../content/rules.yaml")
}
