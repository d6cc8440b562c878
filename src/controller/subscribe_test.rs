#[cfg(test)]
mod tests {
    use crate::controller::subscribe::SubscribeQuery;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_parameters_are_empty() {
        let query = SubscribeQuery::from_pairs(pairs(&[("other", "x")]));

        assert_eq!(query, SubscribeQuery::default());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let query = SubscribeQuery::from_pairs(pairs(&[
            ("group", "news"),
            ("token", "tok1"),
            ("token", "x"),
            ("group", "sport"),
        ]));

        assert_eq!(query.token, "tok1");
        assert_eq!(query.group, "news");
    }
}
