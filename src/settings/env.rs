use toml::{Table, Value};

/// Collect `{PREFIX}__*` environment variables into a nested settings table.
///
/// `__` separates nesting levels (`CONSUL_CFG__LOG__LEVEL` → `log.level`);
/// a single `_` stays part of the key. Keys are lowercased. `true` and
/// `false` (any case) become booleans, every other value stays a string, so
/// a prefix such as `8080` is not turned into a number.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (name, raw) in vars {
        let Some(path) = name.strip_prefix(&needle).filter(|rest| !rest.is_empty()) else {
            continue;
        };
        let segments: Vec<String> = path.split("__").map(str::to_lowercase).collect();
        insert(&mut table, &segments, parse_value(&raw));
    }

    table
}

fn insert(table: &mut Table, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            table.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let entry = table
                .entry(head.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            if let Value::Table(sub) = entry {
                insert(sub, rest, value);
            }
        }
    }
}

fn parse_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        Value::Boolean(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Boolean(false)
    } else {
        Value::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn top_level_key() {
        let table = env_to_table("CONSUL_CFG", vars(&[("CONSUL_CFG__PREFIX", "myapp")]));
        assert_eq!(table["prefix"].as_str(), Some("myapp"));
    }

    #[test]
    fn nested_key() {
        let table = env_to_table("CONSUL_CFG", vars(&[("CONSUL_CFG__LOG__LEVEL", "debug")]));
        assert_eq!(table["log"]["level"].as_str(), Some("debug"));
    }

    #[test]
    fn single_underscore_is_literal() {
        let table = env_to_table("CONSUL_CFG", vars(&[("CONSUL_CFG__SORT_KEYS", "TRUE")]));
        assert_eq!(table["sort_keys"].as_bool(), Some(true));
    }

    #[test]
    fn numbers_stay_strings() {
        let table = env_to_table("CONSUL_CFG", vars(&[("CONSUL_CFG__PREFIX", "8080")]));
        assert_eq!(table["prefix"].as_str(), Some("8080"));
    }

    #[test]
    fn other_variables_are_ignored() {
        let table = env_to_table(
            "CONSUL_CFG",
            vars(&[
                ("HOME", "/root"),
                ("CONSUL_CFG", "x"),
                ("CONSUL_CFG__", "y"),
                ("CONSUL_CFGX__PREFIX", "z"),
            ]),
        );
        assert!(table.is_empty());
    }
}
