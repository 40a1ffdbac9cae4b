//! Threshold suggestions from an ambient-noise and a speech measurement.

use super::meter::{db_to_volume, volume_to_db};

const RECOMMENDED_FLOOR_DB: f32 = -80.0;
const RECOMMENDED_CEILING_DB: f32 = -10.0;
/// A muted input sits well below any real room tone.
const MUTE_BELOW_AMBIENT_DB: f32 = 20.0;
const MUTE_FLOOR_DB: f32 = -100.0;

/// Suggested classifier thresholds, as linear RMS volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRecommendation {
    pub mute_volume: f32,
    pub speaking_min_volume: f32,
    pub min_average_signal_volume: f32,
    pub warning: Option<&'static str>,
}

pub fn recommend_thresholds(ambient_rms: f32, speech_rms: f32) -> ThresholdRecommendation {
    let ambient_db = volume_to_db(ambient_rms);
    let speech_db = volume_to_db(speech_rms);
    let (speaking_db, warning) = recommend_speaking_db(ambient_db, speech_db);

    let mute_db = (ambient_db - MUTE_BELOW_AMBIENT_DB).max(MUTE_FLOOR_DB);
    let average_db = if speech_db > speaking_db {
        (speaking_db + speech_db) / 2.0
    } else {
        speaking_db
    };

    ThresholdRecommendation {
        mute_volume: db_to_volume(mute_db.min(speaking_db - 1.0)),
        speaking_min_volume: db_to_volume(speaking_db),
        min_average_signal_volume: db_to_volume(average_db),
        warning,
    }
}

fn recommend_speaking_db(ambient_db: f32, speech_db: f32) -> (f32, Option<&'static str>) {
    if speech_db <= ambient_db {
        let suggested = (ambient_db + 1.0).clamp(RECOMMENDED_FLOOR_DB, RECOMMENDED_CEILING_DB);
        return (
            suggested,
            Some("Speech is not louder than ambient noise; results may be unreliable."),
        );
    }

    let margin = speech_db - ambient_db;
    let guard = if margin >= 12.0 {
        6.0
    } else if margin >= 6.0 {
        3.0
    } else {
        1.5
    };

    let mut suggested = ambient_db + guard;
    if suggested > speech_db - 1.0 {
        suggested = (ambient_db + speech_db) / 2.0;
    }

    let warning = if margin < 6.0 {
        Some("Speech is close to ambient noise; consider a quieter room or closer mic.")
    } else {
        None
    };

    (
        suggested.clamp(RECOMMENDED_FLOOR_DB, RECOMMENDED_CEILING_DB),
        warning,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_margin_has_no_warning() {
        let rec = recommend_thresholds(db_to_volume(-60.0), db_to_volume(-30.0));
        assert!(rec.warning.is_none());
        assert!((volume_to_db(rec.speaking_min_volume) - -54.0).abs() < 0.01);
        assert!(rec.mute_volume < rec.speaking_min_volume);
        assert!(rec.min_average_signal_volume > rec.speaking_min_volume);
        assert!(rec.min_average_signal_volume < db_to_volume(-30.0));
    }

    #[test]
    fn narrow_margin_warns() {
        let rec = recommend_thresholds(db_to_volume(-40.0), db_to_volume(-37.0));
        assert!(rec.warning.is_some());
        assert!(rec.speaking_min_volume > db_to_volume(-40.0));
        assert!(rec.speaking_min_volume < db_to_volume(-37.0));
    }

    #[test]
    fn speech_quieter_than_ambient_warns() {
        let rec = recommend_thresholds(db_to_volume(-30.0), db_to_volume(-35.0));
        assert!(rec.warning.is_some());
        assert!(rec.mute_volume < rec.speaking_min_volume);
    }

    #[test]
    fn silent_input_stays_ordered() {
        let rec = recommend_thresholds(0.0, 0.0);
        assert!(rec.mute_volume < rec.speaking_min_volume);
        assert!(rec.mute_volume > 0.0);
    }
}
