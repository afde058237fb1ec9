//! Automatic model sizing from the amount of available history.

use crate::models::{HyperparameterProfile, ModelFamily};

/// Lower bound (inclusive) of the second band.
pub const SMALL_DATA_THRESHOLD: usize = 50;
/// Lower bound (inclusive) of the third band.
pub const MEDIUM_DATA_THRESHOLD: usize = 200;
/// Lower bound (inclusive) of the largest band.
pub const LARGE_DATA_THRESHOLD: usize = 1000;

/// Map a historical row count to a hyperparameter profile.
///
/// | rows | family | layers | units | epochs | batch |
/// |---|---|---|---|---|---|
/// | < 50 | lstm | 1 | 32 | 30 | 4 |
/// | 50..200 | lstm | 2 | 64 | 50 | 16 |
/// | 200..1000 | gru | 3 | 128 | 100 | 32 |
/// | >= 1000 | transformer | 4 | 256 | 150 | 64 |
///
/// The returned profile is marked `auto_selected`.
pub fn select_profile(data_size: usize) -> HyperparameterProfile {
    let (model_family, hidden_layers, hidden_units, epochs, batch_size) =
        if data_size < SMALL_DATA_THRESHOLD {
            (ModelFamily::Lstm, 1, 32, 30, 4)
        } else if data_size < MEDIUM_DATA_THRESHOLD {
            (ModelFamily::Lstm, 2, 64, 50, 16)
        } else if data_size < LARGE_DATA_THRESHOLD {
            (ModelFamily::Gru, 3, 128, 100, 32)
        } else {
            (ModelFamily::Transformer, 4, 256, 150, 64)
        };

    HyperparameterProfile {
        model_family,
        hidden_layers,
        hidden_units,
        epochs,
        batch_size,
        auto_selected: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn band(size: usize) -> (ModelFamily, u32, u32, u32, u32) {
        let p = select_profile(size);
        (p.model_family, p.hidden_layers, p.hidden_units, p.epochs, p.batch_size)
    }

    #[test]
    fn test_select_profile_table() {
        let cases = [
            (0, (ModelFamily::Lstm, 1, 32, 30, 4)),
            (1, (ModelFamily::Lstm, 1, 32, 30, 4)),
            (49, (ModelFamily::Lstm, 1, 32, 30, 4)),
            (50, (ModelFamily::Lstm, 2, 64, 50, 16)),
            (199, (ModelFamily::Lstm, 2, 64, 50, 16)),
            (200, (ModelFamily::Gru, 3, 128, 100, 32)),
            (999, (ModelFamily::Gru, 3, 128, 100, 32)),
            (1000, (ModelFamily::Transformer, 4, 256, 150, 64)),
            (1_000_000, (ModelFamily::Transformer, 4, 256, 150, 64)),
        ];

        for (size, expected) in cases {
            assert_eq!(band(size), expected, "data_size={}", size);
        }
    }

    #[test]
    fn test_selected_profile_is_marked_auto_and_valid() {
        for size in [0, 50, 200, 1000] {
            let profile = select_profile(size);
            assert!(profile.auto_selected);
            assert!(profile.validate().is_ok());
        }
    }

    proptest! {
        #[test]
        fn prop_select_profile_is_one_of_four_bands(size in 0usize..5_000) {
            let known = [
                select_profile(0),
                select_profile(SMALL_DATA_THRESHOLD),
                select_profile(MEDIUM_DATA_THRESHOLD),
                select_profile(LARGE_DATA_THRESHOLD),
            ];
            let profile = select_profile(size);
            prop_assert!(known.contains(&profile));
            prop_assert_eq!(profile, select_profile(size));
        }

        #[test]
        fn prop_model_size_never_shrinks_with_more_data(size in 0usize..5_000) {
            let smaller = select_profile(size);
            let larger = select_profile(size + 1);
            prop_assert!(larger.hidden_units >= smaller.hidden_units);
            prop_assert!(larger.epochs >= smaller.epochs);
        }
    }
}
