use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use skipkv_skiplist::prelude::*;

use crate::{
    error::Result,
    format::{decode_record, is_lossless, write_record},
};

/// Outcome of reading a dump back into a list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub inserted: usize,
    /// Records whose key was already in the list.
    pub duplicates: usize,
    /// Malformed lines and lines whose key or value did not parse.
    pub skipped: usize,
}

/// Writes every entry of `list` in key order, one record per line, and
/// returns the number of records written.
///
/// The list stays locked for the whole pass.
pub fn dump_to<K, V, C, W>(list: &SkipList<K, V, C>, writer: &mut W) -> Result<usize>
where
    K: Display,
    V: Display,
    C: Comparator<Item = K>,
    W: Write + ?Sized,
{
    let iter = list.iter();
    let mut written = 0;
    for (key, value) in iter.entries() {
        let (key, value) = (key.to_string(), value.to_string());
        if !is_lossless(&key, &value) {
            tracing::warn!(%key, %value, "record will not load back as written");
        }
        write_record(writer, &key, &value)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Inserts every well-formed record read from `reader` into `list`.
///
/// Keys already present are left alone, so the first occurrence of a key
/// wins. Bad lines are skipped, only I/O failures are errors.
pub fn load_from<K, V, C, R>(list: &SkipList<K, V, C>, reader: R) -> Result<LoadStats>
where
    K: FromStr,
    V: FromStr,
    C: Comparator<Item = K>,
    R: BufRead,
{
    let mut stats = LoadStats::default();

    for (lineno, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let Some((key, value)) = std::str::from_utf8(&line).ok().and_then(decode_record) else {
            tracing::debug!(lineno, "skip malformed line");
            stats.skipped += 1;
            continue;
        };

        let (Ok(key), Ok(value)) = (key.parse::<K>(), value.parse::<V>()) else {
            tracing::debug!(lineno, key, value, "skip unparsable record");
            stats.skipped += 1;
            continue;
        };

        if list.insert(key, value) {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    tracing::info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        "load finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Cursor};

    use anyhow::Result;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use skipkv_skiplist::prelude::*;

    use crate::test_utils::init_tracing;

    use super::{LoadStats, dump_to, load_from};

    fn entries<K: Clone, V: Clone, C: Comparator<Item = K>>(
        list: &SkipList<K, V, C>,
    ) -> Vec<(K, V)> {
        list.iter()
            .entries()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[test]
    fn dump_in_key_order() -> Result<()> {
        let list = SkipList::new(DefaultComparator::default());
        for (k, v) in [(3, 3), (1, 1), (4, 1), (2, 2)] {
            list.insert(k, v);
        }

        let mut buf = Vec::new();
        assert_eq!(dump_to(&list, &mut buf)?, 4);
        assert_eq!(String::from_utf8(buf)?, "1:1\n2:2\n3:3\n4:1\n");
        Ok(())
    }

    #[test]
    fn dump_follows_comparator() -> Result<()> {
        let list = SkipList::new(ReverseComparator::default());
        for i in 1..=3 {
            list.insert(i, i * 10);
        }

        let mut buf = Vec::new();
        dump_to(&list, &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "3:30\n2:20\n1:10\n");
        Ok(())
    }

    #[test]
    fn dump_empty_list() -> Result<()> {
        let list: SkipList<u32, u32, _> = SkipList::new(DefaultComparator::default());
        let mut buf = Vec::new();
        assert_eq!(dump_to(&list, &mut buf)?, 0);
        assert!(buf.is_empty());
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        init_tracing();

        let mut rng = StdRng::seed_from_u64(17);
        let list = SkipList::new(DefaultComparator::default());
        for _ in 0..2_000 {
            list.insert(rng.random_range(0..10_000i64), rng.random::<u32>());
        }

        let mut buf = Vec::new();
        dump_to(&list, &mut buf)?;

        let restored: SkipList<i64, u32, _> = SkipList::new(DefaultComparator::default());
        let stats = load_from(&restored, Cursor::new(buf))?;
        assert_eq!(stats.inserted, list.len());
        assert_eq!(stats.duplicates, 0);
        assert_eq!(stats.skipped, 0);

        let expected = entries(&list).into_iter().collect::<HashMap<_, _>>();
        let actual = entries(&restored).into_iter().collect::<HashMap<_, _>>();
        assert_eq!(actual, expected);
        Ok(())
    }

    #[test]
    fn load_skips_bad_lines() -> Result<()> {
        init_tracing();

        let input = "1:10\n\nnot a record\n:5\n6:\nx:1\n2:y\n3:30\r\n4:40";
        let list = SkipList::new(DefaultComparator::default());
        let stats = load_from(&list, Cursor::new(input))?;

        assert_eq!(
            stats,
            LoadStats {
                inserted: 3,
                duplicates: 0,
                skipped: 6,
            }
        );
        assert_eq!(entries(&list), vec![(1, 10), (3, 30), (4, 40)]);
        Ok(())
    }

    #[test]
    fn load_skips_invalid_utf8() -> Result<()> {
        let input = b"a:1\n\xff\xfe:2\nb:3\n".to_vec();
        let list = SkipList::new(DefaultComparator::<String>::default());
        let stats = load_from::<_, String, _, _>(&list, Cursor::new(input))?;

        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(list.search(&"b".to_string()), Some("3".to_string()));
        Ok(())
    }

    #[test]
    fn load_never_overwrites() -> Result<()> {
        let list = SkipList::new(DefaultComparator::default());
        list.insert("k1".to_string(), "kept".to_string());

        let input = "k1:lost\nk2:first\nk2:second\nk3:v:with:colons\n";
        let stats = load_from(&list, Cursor::new(input))?;

        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(
            entries(&list),
            vec![
                ("k1".to_string(), "kept".to_string()),
                ("k2".to_string(), "first".to_string()),
                ("k3".to_string(), "v:with:colons".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn load_with_length_order() -> Result<()> {
        let list: SkipList<String, String, _> =
            SkipList::new(LessComparator::new(|a: &String, b: &String| {
                a.len() < b.len()
            }));
        let input = "lzw1111:555\nlzw:111\nabc:999\nlzw11:333\n";
        let stats = load_from(&list, Cursor::new(input))?;

        // "abc" collides with "lzw" under this order
        assert_eq!(stats.duplicates, 1);
        let keys = entries(&list).into_iter().map(|(k, _)| k).collect_vec();
        assert_eq!(keys, vec!["lzw", "lzw11", "lzw1111"]);
        Ok(())
    }
}
