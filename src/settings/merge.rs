use toml::{Table, Value};

/// Lay `overlay` over `base`. Tables present on both sides merge
/// recursively; anything else in `overlay` replaces what `base` had.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Table(lower)), Value::Table(upper)) => {
                Value::Table(deep_merge(lower, upper))
            }
            (_, upper) => upper,
        };
        base.insert(key, merged);
    }
    base
}

/// Expand `("log.level", value)` overrides into `{log = {level = value}}`.
///
/// Later entries win. A scalar sitting where a table is needed is replaced.
pub fn overrides_to_table(entries: &[(String, Value)]) -> Table {
    let mut table = Table::new();
    for (dotted_key, value) in entries {
        let segments: Vec<&str> = dotted_key.split('.').collect();
        set_path(&mut table, &segments, value.clone());
    }
    table
}

fn set_path(table: &mut Table, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = table;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !slot.is_table() {
            *slot = Value::Table(Table::new());
        }
        current = match slot {
            Value::Table(sub) => sub,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}
