use std::collections::HashMap;

use foundation::math::canonical_f64;

use crate::record::FireRecord;

/// Reconciliation identity of a rendered fire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FireKey(pub String);

impl FireKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FireKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base key for a record: the source id when present, else name + latitude +
/// longitude concatenated.
pub fn base_key(record: &FireRecord) -> String {
    match &record.source_id {
        Some(id) => format!("id:{id}"),
        None => format!(
            "{}{}{}",
            record.name.as_deref().unwrap_or(""),
            canonical_f64(record.latitude),
            canonical_f64(record.longitude)
        ),
    }
}

/// Assigns one unique key per record, in record order.
///
/// The first record with a given base key keeps it; later collisions get a
/// `#n` suffix (`#2`, `#3`, ...), so keys stay stable whichever subset is
/// visible.
pub fn assign_keys(records: &[FireRecord]) -> Vec<FireKey> {
    let mut seen: HashMap<String, u32> = HashMap::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let base = base_key(record);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            out.push(FireKey(base));
        } else {
            out.push(FireKey(format!("{base}#{count}")));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{FireKey, assign_keys, base_key};
    use crate::record::fixtures::fire;

    #[test]
    fn base_key_concatenates_name_and_coordinates() {
        let f = fire("Creek", 1, None, "Natural");
        assert_eq!(base_key(&f), "Creek37-120");

        let mut unnamed = f.clone();
        unnamed.name = None;
        unnamed.latitude = 36.25;
        assert_eq!(base_key(&unnamed), "36.25-120");

        unnamed.latitude = -0.0;
        assert_eq!(base_key(&unnamed), "0-120");
    }

    #[test]
    fn source_id_wins_over_name() {
        let mut f = fire("Creek", 1, None, "Natural");
        f.source_id = Some("201".to_string());
        assert_eq!(base_key(&f), "id:201");
    }

    #[test]
    fn duplicates_get_occurrence_suffix() {
        let a = fire("Creek", 1, None, "Natural");
        let b = fire("Other", 1, None, "Natural");
        let keys = assign_keys(&[a.clone(), b, a.clone(), a]);
        assert_eq!(
            keys,
            vec![
                FireKey("Creek37-120".to_string()),
                FireKey("Other37-120".to_string()),
                FireKey("Creek37-120#2".to_string()),
                FireKey("Creek37-120#3".to_string()),
            ]
        );
    }
}
