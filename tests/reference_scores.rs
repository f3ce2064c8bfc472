//! Scores against a fixture of hand-checked reference surfaces.

use nccmatch::{correlate, Raster, TemplatePlan};
use serde::Deserialize;

#[derive(Deserialize)]
struct Fixture {
    tolerance: f32,
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    image: RasterSpec,
    template: RasterSpec,
    scores: Vec<f32>,
}

#[derive(Deserialize)]
struct RasterSpec {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterSpec {
    fn to_raster(&self) -> Raster {
        Raster::new(self.data.clone(), self.width, self.height).unwrap()
    }
}

#[test]
fn surfaces_match_reference_fixture() {
    let fixture: Fixture =
        serde_json::from_str(include_str!("fixtures/reference_scores.json")).unwrap();
    assert!(!fixture.cases.is_empty());

    for case in &fixture.cases {
        let image = case.image.to_raster();
        let tpl = case.template.to_raster();
        let surface = correlate(image.view(), &TemplatePlan::from_view(tpl.view()));
        assert_eq!(
            surface.width(),
            case.image.width - case.template.width + 1,
            "{}",
            case.name
        );
        assert_eq!(surface.as_slice().len(), case.scores.len(), "{}", case.name);
        for (idx, (got, want)) in surface.as_slice().iter().zip(&case.scores).enumerate() {
            assert!(
                (got - want).abs() <= fixture.tolerance,
                "{} cell {idx}: got {got}, want {want}",
                case.name
            );
        }
    }
}
