//! Property-based round-trip and symmetry checks for the celestial frame
//! conversion engine (§8 universal invariants).

use astro_rs::frames::{separation, Crs, CoordinateReferenceFrame, SkyPosition};
use astro_rs::log::NullLogSink;
use proptest::prelude::*;

fn crs_strategy() -> impl Strategy<Value = Crs> {
    prop_oneof![
        Just(Crs::Equatorial(CoordinateReferenceFrame::Icrs)),
        Just(Crs::Equatorial(CoordinateReferenceFrame::J2000)),
        Just(Crs::Equatorial(CoordinateReferenceFrame::fk5_default())),
        Just(Crs::Equatorial(CoordinateReferenceFrame::fk4_default())),
        Just(Crs::Equatorial(CoordinateReferenceFrame::fk4_no_eterms_default())),
        Just(Crs::Ecliptic(CoordinateReferenceFrame::Icrs)),
        Just(Crs::Galactic),
        Just(Crs::SuperGalactic),
    ]
}

proptest! {
    /// Longitude normalization: every constructed `SkyPosition` has a
    /// longitude in `[0, 360)`.
    #[test]
    fn longitude_is_normalized(lon in -720.0..720.0, lat in -89.9..89.9) {
        let pos = SkyPosition::new(lon, lat, Crs::Equatorial(CoordinateReferenceFrame::Icrs));
        prop_assert!(pos.longitude_deg >= 0.0 && pos.longitude_deg < 360.0);
    }

    /// Frame round trip: converting A → B → A is the identity within 1e-9
    /// degrees, for any pair of supported coordinate reference systems.
    #[test]
    fn frame_round_trip(
        lon in 0.0..360.0,
        lat in -89.9..89.9,
        src in crs_strategy(),
        tgt in crs_strategy(),
    ) {
        let original = SkyPosition::new(lon, lat, src);
        let converted = original.convert_to(tgt, &NullLogSink);
        let back = converted.convert_to(src, &NullLogSink);

        prop_assert!((back.longitude_deg - original.longitude_deg).abs() < 1e-9
            || (back.longitude_deg - original.longitude_deg).abs() > 359.999_999_99);
        prop_assert!((back.latitude_deg - original.latitude_deg).abs() < 1e-9);
    }

    /// Separation symmetry: `separation(p1, p2) == separation(p2, p1)`,
    /// never exceeds 180 degrees, and is zero for identical positions.
    #[test]
    fn separation_is_symmetric_and_bounded(
        lon1 in 0.0..360.0,
        lat1 in -89.9..89.9,
        lon2 in 0.0..360.0,
        lat2 in -89.9..89.9,
        crs in crs_strategy(),
    ) {
        let p1 = SkyPosition::new(lon1, lat1, crs);
        let p2 = SkyPosition::new(lon2, lat2, crs);

        let d12 = separation(&p1, &p2, &NullLogSink);
        let d21 = separation(&p2, &p1, &NullLogSink);
        prop_assert!((d12 - d21).abs() < 1e-9);
        prop_assert!(d12 >= 0.0 && d12 <= 180.0 + 1e-9);

        let d11 = separation(&p1, &p1, &NullLogSink);
        prop_assert!(d11 < 1e-9);
    }
}
