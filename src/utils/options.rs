use serenity::all::CommandDataOption;

/// Extract a string option by name
pub fn str_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
}

/// Extract an integer option by name
pub fn int_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(json: serde_json::Value) -> Vec<CommandDataOption> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn finds_options_by_name() {
        let options = options(serde_json::json!([
            { "name": "question", "type": 3, "value": "Define osmosis" },
            { "name": "delay", "type": 4, "value": 15 }
        ]));

        assert_eq!(str_option(&options, "question"), Some("Define osmosis"));
        assert_eq!(int_option(&options, "delay"), Some(15));
    }

    #[test]
    fn missing_or_mistyped_options_yield_none() {
        let options = options(serde_json::json!([
            { "name": "delay", "type": 4, "value": 15 }
        ]));

        assert_eq!(str_option(&options, "question"), None);
        assert_eq!(str_option(&options, "delay"), None);
        assert_eq!(int_option(&options, "question"), None);
    }
}
