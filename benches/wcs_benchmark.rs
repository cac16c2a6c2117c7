use std::hint::black_box;

use astro_rs::frames::{Crs, CoordinateReferenceFrame, SkyPosition};
use astro_rs::log::NullLogSink;
use astro_rs::wcs::{Wcs, WcsKeywords};
use criterion::{criterion_group, criterion_main, Criterion};

fn tan_wcs() -> Wcs {
    let mut kw = WcsKeywords::new();
    kw.set_double("CRPIX1", 512.5);
    kw.set_double("CRPIX2", 512.5);
    kw.set_double("CRVAL1", 182.63442);
    kw.set_double("CRVAL2", 39.404782);
    kw.set_double("CDELT1", -1.2e-5);
    kw.set_double("CDELT2", 1.2e-5);
    kw.set_string("CTYPE1", "RA---TAN");
    kw.set_string("CTYPE2", "DEC--TAN");
    kw.set_int("NAXIS1", 1024);
    kw.set_int("NAXIS2", 1024);
    Wcs::init(&kw).unwrap()
}

fn ait_wcs() -> Wcs {
    let mut kw = WcsKeywords::new();
    kw.set_double("CRPIX1", 96.0);
    kw.set_double("CRPIX2", 96.0);
    kw.set_double("CRVAL1", 0.0);
    kw.set_double("CRVAL2", -90.0);
    kw.set_double("CDELT1", -1.0 / 15.0);
    kw.set_double("CDELT2", 1.0 / 15.0);
    kw.set_string("CTYPE1", "RA---AIT");
    kw.set_string("CTYPE2", "DEC--AIT");
    kw.set_double("LONPOLE", 180.0);
    kw.set_int("NAXIS1", 192);
    kw.set_int("NAXIS2", 192);
    Wcs::init(&kw).unwrap()
}

fn bench_wcs_init(c: &mut Criterion) {
    c.bench_function("Wcs::init (TAN)", |b| {
        b.iter(|| {
            black_box(tan_wcs());
        })
    });
}

fn bench_pixel_to_sky(c: &mut Criterion) {
    let wcs = tan_wcs();
    c.bench_function("Wcs::pixel_to_sky (TAN)", |b| {
        b.iter(|| {
            black_box(wcs.pixel_to_sky(black_box(123.4), black_box(567.8)).unwrap());
        })
    });

    let ait = ait_wcs();
    c.bench_function("Wcs::pixel_to_sky (AIT)", |b| {
        b.iter(|| {
            black_box(ait.pixel_to_sky(black_box(40.0), black_box(150.0)).unwrap());
        })
    });
}

fn bench_sky_to_pixel(c: &mut Criterion) {
    let wcs = tan_wcs();
    c.bench_function("Wcs::sky_to_pixel (TAN)", |b| {
        b.iter(|| {
            black_box(
                wcs.sky_to_pixel(black_box(182.6), black_box(39.4))
                    .unwrap(),
            );
        })
    });
}

fn bench_frame_conversion(c: &mut Criterion) {
    let icrs = SkyPosition::new(182.63867, 39.401167, Crs::Equatorial(CoordinateReferenceFrame::Icrs));
    c.bench_function("SkyPosition::convert_to (ICRS -> SuperGalactic)", |b| {
        b.iter(|| {
            black_box(icrs.convert_to(black_box(Crs::SuperGalactic), &NullLogSink));
        })
    });

    let fk4 = SkyPosition::new(
        182.63867,
        39.401167,
        Crs::Equatorial(CoordinateReferenceFrame::fk4_default()),
    );
    c.bench_function("SkyPosition::convert_to (FK4 -> FK5)", |b| {
        b.iter(|| {
            black_box(fk4.convert_to(
                black_box(Crs::Equatorial(CoordinateReferenceFrame::fk5_default())),
                &NullLogSink,
            ));
        })
    });
}

criterion_group!(
    benches,
    bench_wcs_init,
    bench_pixel_to_sky,
    bench_sky_to_pixel,
    bench_frame_conversion
);
criterion_main!(benches);
