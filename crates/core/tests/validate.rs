use galera_hostgroups_core::error::{Field, ValidationError};
use galera_hostgroups_core::{validate, RawMapping};
use proptest::prelude::*;

const HOSTGROUPS: [Field; 4] = [
    Field::WriterHostgroup,
    Field::BackupWriterHostgroup,
    Field::ReaderHostgroup,
    Field::OfflineHostgroup,
];

fn column() -> impl Strategy<Value = i64> {
    0..=i64::from(u32::MAX)
}

fn distinct_hostgroups() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::hash_set(column(), 4).prop_map(|ids| ids.into_iter().collect())
}

fn mapping(ids: &[i64]) -> RawMapping {
    RawMapping {
        writer_hostgroup: ids[0],
        backup_writer_hostgroup: ids[1],
        reader_hostgroup: ids[2],
        offline_hostgroup: ids[3],
        active: 1,
        max_writers: 1,
        writer_is_also_reader: 0,
        max_transactions_behind: 0,
        comment: String::new(),
    }
}

proptest! {
    #[test]
    fn valid_input_is_returned_unmodified(
        ids in distinct_hostgroups(),
        active in 0i64..=1,
        max_writers in column(),
        writer_is_also_reader in 0i64..=2,
        max_transactions_behind in column(),
        comment in ".*",
    ) {
        let raw = RawMapping {
            active,
            max_writers,
            writer_is_also_reader,
            max_transactions_behind,
            comment,
            ..mapping(&ids)
        };
        let validated = validate(&raw);
        prop_assert!(validated.is_ok());
        prop_assert_eq!(RawMapping::from(validated.unwrap()), raw);
    }

    #[test]
    fn coinciding_pair_is_named(
        ids in distinct_hostgroups(),
        (i, j) in (0usize..4, 0usize..4).prop_filter("two different slots", |(i, j)| i != j),
    ) {
        let mut ids = ids;
        ids[j] = ids[i];
        let raw = mapping(&ids);

        let err = validate(&raw).unwrap_err();
        prop_assert_eq!(validate(&raw), Err(err.clone()));
        let ValidationError::NotDistinct { first, second } = err else {
            return Err(TestCaseError::fail(format!("unexpected error {err:?}")));
        };
        let mut named = [first, second];
        let mut expected = [HOSTGROUPS[i], HOSTGROUPS[j]];
        named.sort_by_key(|field| field.as_str());
        expected.sort_by_key(|field| field.as_str());
        prop_assert_eq!(named, expected);
    }

    #[test]
    fn negative_hostgroup_is_rejected(
        ids in distinct_hostgroups(),
        slot in 0usize..4,
        negative in i64::MIN..0,
    ) {
        let mut ids = ids;
        ids[slot] = negative;
        let err = validate(&mapping(&ids)).unwrap_err();
        prop_assert_eq!(err, ValidationError::Negative { field: HOSTGROUPS[slot], value: negative });
    }

    #[test]
    fn out_of_range_enumerations_are_rejected(
        ids in distinct_hostgroups(),
        active in prop_oneof![i64::MIN..0, 2..i64::MAX],
        writer_is_also_reader in prop_oneof![i64::MIN..0, 3..i64::MAX],
    ) {
        let raw = RawMapping { active, ..mapping(&ids) };
        prop_assert_eq!(validate(&raw), Err(ValidationError::ActiveOutOfRange { value: active }));

        let raw = RawMapping { writer_is_also_reader, ..mapping(&ids) };
        prop_assert_eq!(
            validate(&raw),
            Err(ValidationError::WriterIsAlsoReaderOutOfRange { value: writer_is_also_reader })
        );
    }
}
