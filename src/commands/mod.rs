pub mod apply;
pub mod patterns;
pub mod run;

pub type CmdResult<T> = relabel::Result<(T, i32)>;

/// Parse repeated `OLD=NEW` flags into rename pairs.
pub fn parse_map_pairs(maps: &[String]) -> relabel::Result<Vec<(String, String)>> {
    maps.iter()
        .map(|raw| {
            raw.split_once('=')
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .ok_or_else(|| {
                    relabel::Error::Config(format!(
                        "Invalid --map '{raw}': expected OLD=NEW"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_pairs() {
        let pairs = parse_map_pairs(&["a=b".to_string(), "c=d".to_string()]).unwrap();
        assert_eq!(pairs, vec![
            ("a".to_string(), "b".to_string()),
            ("c".to_string(), "d".to_string()),
        ]);
    }

    #[test]
    fn rejects_missing_separator() {
        let err = parse_map_pairs(&["nope".to_string()]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn keeps_equals_in_replacement() {
        let pairs = parse_map_pairs(&["a=b=c".to_string()]).unwrap();
        assert_eq!(pairs[0], ("a".to_string(), "b=c".to_string()));
    }
}
