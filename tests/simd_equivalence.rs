#![cfg(feature = "simd")]

use nccmatch::lowlevel::{CcoeffScalar, CcoeffSimd, Kernel, TemplatePlan};
use nccmatch::Raster;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn simd_surface_is_identical_to_scalar() {
    let mut rng = StdRng::seed_from_u64(314);
    let source = Raster::from_fn(83, 41, |_, _| rng.random_range(0..=255)).unwrap();
    for (tw, th) in [(1, 1), (7, 3), (8, 8), (13, 9), (33, 5)] {
        let tpl = Raster::from_fn(tw, th, |_, _| rng.random_range(0..=255)).unwrap();
        let plan = TemplatePlan::from_view(tpl.view());
        assert_eq!(
            CcoeffSimd::correlate(source.view(), &plan),
            CcoeffScalar::correlate(source.view(), &plan),
            "template {tw}x{th}"
        );
    }
}
