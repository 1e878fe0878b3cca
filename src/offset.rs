use crate::error::SubburnError;

use rand::Rng;

/// Picks where in the video the subtitles start, in whole seconds.
///
/// An explicit start is used as given once it fits. Otherwise a random start
/// is drawn from `[0, media - duration - 1]`. Either way the returned start
/// satisfies `start + duration < media`.
pub fn resolve<R: Rng + ?Sized>(
    rng: &mut R,
    explicit: Option<u64>,
    duration: u64,
    media: u64,
) -> Result<u64, SubburnError> {
    if duration >= media {
        return Err(SubburnError::InsufficientMediaLength {
            required: duration,
            available: media,
        });
    }
    match explicit {
        Some(start) if start.saturating_add(duration) >= media => {
            Err(SubburnError::StartOutOfRange {
                start,
                duration,
                available: media,
            })
        }
        Some(start) => Ok(start),
        None => Ok(random_start(rng, duration, media)),
    }
}

pub fn random_start<R: Rng + ?Sized>(rng: &mut R, duration: u64, media: u64) -> u64 {
    let upper = media.saturating_sub(duration).saturating_sub(1);
    rng.gen_range(0..=upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_start_fits() {
        let mut rng = StdRng::seed_from_u64(7);
        for media in 1..60 {
            for duration in 0..media {
                let start = resolve(&mut rng, None, duration, media).unwrap();
                assert!(start + duration < media);
            }
        }
    }

    #[test]
    fn seeded_start_is_reproducible() {
        let a = random_start(&mut StdRng::seed_from_u64(42), 10, 600);
        let b = random_start(&mut StdRng::seed_from_u64(42), 10, 600);
        assert_eq!(a, b);
    }

    #[test]
    fn range_never_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_start(&mut rng, 10, 10), 0);
        assert_eq!(random_start(&mut rng, 50, 10), 0);
        assert_eq!(random_start(&mut rng, 9, 10), 0);
    }

    #[test]
    fn explicit_start_used_verbatim() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve(&mut rng, Some(30), 10, 100).unwrap(), 30);
        assert_eq!(resolve(&mut rng, Some(89), 10, 100).unwrap(), 89);
    }

    #[test]
    fn explicit_start_too_late() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            resolve(&mut rng, Some(90), 10, 100),
            Err(SubburnError::StartOutOfRange { start: 90, .. })
        ));
        assert!(matches!(
            resolve(&mut rng, Some(u64::MAX), 10, 100),
            Err(SubburnError::StartOutOfRange { .. })
        ));
    }

    #[test]
    fn video_too_short() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            resolve(&mut rng, None, 10, 10),
            Err(SubburnError::InsufficientMediaLength {
                required: 10,
                available: 10
            })
        ));
        assert!(matches!(
            resolve(&mut rng, Some(0), 11, 10),
            Err(SubburnError::InsufficientMediaLength { .. })
        ));
    }
}
