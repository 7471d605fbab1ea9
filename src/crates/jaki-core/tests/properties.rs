use jaki_core::{fibonacci, Alphabet, NoteKind, Pattern, PatternSpace, PerformanceMapper};
use proptest::prelude::*;
use std::collections::HashSet;

fn kinds() -> impl Strategy<Value = Vec<NoteKind>> {
    prop::collection::vec(prop_oneof![Just(NoteKind::Short), Just(NoteKind::Long)], 0..40)
}

fn alphabets() -> impl Strategy<Value = Alphabet> {
    (any::<char>(), any::<char>())
        .prop_filter("symbols must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| Alphabet::from_chars(a, b).unwrap())
}

proptest! {
    #[test]
    fn count_is_fibonacci(length in 0usize..=185) {
        let space = PatternSpace::of_length(length);
        prop_assert_eq!(space.count().ok(), fibonacci(length + 1));
    }

    #[test]
    fn full_iteration_is_exact(length in 0usize..=16) {
        let space = PatternSpace::of_length(length);
        let all: Vec<Pattern> = space.iter().collect();
        let unique: HashSet<&Pattern> = all.iter().collect();

        prop_assert_eq!(all.len() as u128, space.count().unwrap());
        prop_assert_eq!(unique.len(), all.len());
        prop_assert!(all.iter().all(|p| p.total_duration() == length));
    }

    #[test]
    fn render_parse_round_trip(kinds in kinds(), alphabet in alphabets()) {
        let pattern = Pattern::from_kinds(kinds, Alphabet::default());
        let rendered = pattern.render_with(alphabet, "");
        prop_assert_eq!(Pattern::parse(&rendered, alphabet).unwrap(), pattern);
    }

    #[test]
    fn head_is_prefix(length in 0usize..=14, n in 0u128..700) {
        let space = PatternSpace::of_length(length);
        let head: Vec<Pattern> = space.head(n).collect();
        let prefix: Vec<Pattern> = space.iter().take(n as usize).collect();
        prop_assert_eq!(head, prefix);
    }

    #[test]
    fn slice_matches_step_by(length in 0usize..=12, start in 0u128..240, len in 0u128..240, step in 1u128..8) {
        let space = PatternSpace::of_length(length);
        let start = start.min(space.count().unwrap());
        let stop = start + len;

        let sliced: Vec<Pattern> = space.slice(start, Some(stop), step).unwrap().collect();
        let all: Vec<Pattern> = space.iter().collect();
        let expected: Vec<Pattern> = all
            .into_iter()
            .skip(start as usize)
            .take((stop - start) as usize)
            .step_by(step as usize)
            .collect();
        prop_assert_eq!(sliced, expected);
    }

    #[test]
    fn rank_inverts_get(length in 0usize..=185, seed in any::<u128>()) {
        let space = PatternSpace::of_length(length);
        let index = seed % space.count().unwrap();
        let pattern = space.get(index).unwrap();
        prop_assert_eq!(pattern.total_duration(), length);
        prop_assert_eq!(space.rank(&pattern).unwrap(), index);
    }

    #[test]
    fn long_spaces_index_and_rank(length in 186usize..=240, index in any::<u128>()) {
        let space = PatternSpace::of_length(length);
        prop_assert!(space.count().is_err());
        let pattern = space.get(index).unwrap();
        prop_assert_eq!(pattern.total_duration(), length);
        prop_assert_eq!(space.rank(&pattern).unwrap(), index);
    }

    #[test]
    fn chosen_patterns_are_members(length in 0usize..=60, k in 0usize..20) {
        let space = PatternSpace::of_length(length);
        let chosen = space.choose(k).unwrap();
        prop_assert_eq!(chosen.len(), k);
        for pattern in chosen.iter() {
            prop_assert!(space.rank(pattern).is_ok());
        }
    }

    #[test]
    fn one_event_per_unit_of_duration(kinds in kinds()) {
        let pattern = Pattern::from_kinds(kinds, Alphabet::default());
        let events = PerformanceMapper::default().map(&pattern);
        prop_assert_eq!(events.len(), pattern.total_duration());
    }
}
