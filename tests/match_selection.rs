use nccmatch::{
    find_image_matches, quick_match_exist, quick_match_position, select_matches,
    select_matches_cancellable, CancelToken, ImageView, Match, MatchConfig, Matcher,
    NccMatchError, Point, Raster, TemplatePlan,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn textured_template(seed: u64, width: usize, height: usize) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    Raster::from_fn(width, height, |_, _| rng.random_range(1..=255)).unwrap()
}

fn embed(width: usize, height: usize, fill: u8, patch: &Raster, at: &[(usize, usize)]) -> Raster {
    let mut data = vec![fill; width * height];
    for &(x0, y0) in at {
        for (dy, row) in patch.view().rows().enumerate() {
            let start = (y0 + dy) * width + x0;
            data[start..start + row.len()].copy_from_slice(row);
        }
    }
    Raster::new(data, width, height).unwrap()
}

fn diagonal(w: usize, h: usize) -> f64 {
    ((w * w + h * h) as f64).sqrt()
}

fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

#[test]
fn white_square_is_located_at_its_center() {
    let white = Raster::from_fn(10, 10, |_, _| 255).unwrap();
    let source = embed(100, 100, 0, &white, &[(20, 30)]);

    let located = quick_match_position(source.view(), white.view(), 0.9).unwrap();
    assert!((located.x - 25.0).abs() < 1e-6);
    assert!((located.y - 35.0).abs() < 1e-6);
    assert!(located.score > 0.95);

    assert!(quick_match_exist(source.view(), white.view(), 0.95).unwrap());
}

#[test]
fn two_instances_yield_exactly_two_matches() {
    let tpl = textured_template(17, 10, 10);
    let source = embed(100, 100, 0, &tpl, &[(10, 10), (80, 80)]);

    let matches = find_image_matches(source.view(), tpl.view(), 0.9, 5).unwrap();
    assert_eq!(matches.len(), 2, "{matches:?}");
    let mut centers: Vec<Point> = matches.iter().map(|m| m.center).collect();
    centers.sort_by_key(|p| (p.y, p.x));
    assert_eq!(centers, vec![Point::new(15, 15), Point::new(85, 85)]);
    assert!(matches.iter().all(|m| m.score > 0.999));
}

#[test]
fn matches_are_sorted_and_mutually_separated() {
    let tpl = textured_template(23, 8, 6);
    let spots = [(5, 5), (40, 8), (12, 30), (50, 40), (30, 20)];
    let mut rng = StdRng::seed_from_u64(1);
    let mut source = embed(70, 56, 0, &tpl, &spots).into_vec();
    for value in source.iter_mut() {
        if *value == 0 {
            *value = rng.random_range(0..40);
        }
    }
    let source = Raster::new(source, 70, 56).unwrap();

    let matches = find_image_matches(source.view(), tpl.view(), 0.5, 10).unwrap();
    assert!(matches.len() >= spots.len());
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    let radius = diagonal(8, 6);
    for (i, a) in matches.iter().enumerate() {
        assert!(a.score >= 0.5);
        for b in &matches[i + 1..] {
            assert!(distance(a.center, b.center) >= radius);
        }
    }
    for &(x, y) in &spots {
        let center = Point::new(x + 4, y + 3);
        assert!(matches.iter().any(|m| m.center == center), "missing {center:?}");
    }
}

#[test]
fn count_and_threshold_limit_results() {
    let tpl = textured_template(31, 6, 6);
    let source = embed(60, 60, 0, &tpl, &[(2, 2), (30, 3), (5, 40)]);

    let one = find_image_matches(source.view(), tpl.view(), 0.9, 1).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].center, Point::new(5, 5));

    assert!(find_image_matches(source.view(), tpl.view(), 0.9, 0)
        .unwrap()
        .is_empty());
    assert!(find_image_matches(source.view(), tpl.view(), 1.5, 5)
        .unwrap()
        .is_empty());
}

#[test]
fn absent_template_is_not_reported() {
    let mut rng = StdRng::seed_from_u64(77);
    let source = Raster::from_fn(64, 64, |_, _| rng.random_range(0..=255)).unwrap();
    let tpl = textured_template(78, 8, 8);

    assert!(!quick_match_exist(source.view(), tpl.view(), 0.95).unwrap());
    assert!(find_image_matches(source.view(), tpl.view(), 0.9, 5)
        .unwrap()
        .is_empty());
    let err = quick_match_position(source.view(), tpl.view(), 0.9).unwrap_err();
    match err {
        NccMatchError::NoMatchFound {
            best_score,
            threshold,
        } => {
            assert!(best_score <= 0.9);
            assert_eq!(threshold, 0.9);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn position_threshold_is_strict() {
    let tpl = textured_template(5, 6, 6);
    let source = embed(30, 30, 0, &tpl, &[(12, 9)]);
    assert!(quick_match_position(source.view(), tpl.view(), 0.99).is_ok());
    assert!(matches!(
        quick_match_position(source.view(), tpl.view(), 1.0),
        Err(NccMatchError::NoMatchFound { .. })
    ));
}

#[test]
fn oversized_template_reports_no_match() {
    let source = Raster::from_fn(5, 5, |x, y| (x * y) as u8).unwrap();
    let tpl = Raster::from_fn(6, 6, |x, y| (x + y) as u8).unwrap();

    assert!(!quick_match_exist(source.view(), tpl.view(), 0.95).unwrap());
    assert!(find_image_matches(source.view(), tpl.view(), 0.9, 5)
        .unwrap()
        .is_empty());
    assert_eq!(
        quick_match_position(source.view(), tpl.view(), 0.9).unwrap_err(),
        NccMatchError::NoMatchFound {
            best_score: -1.0,
            threshold: 0.9,
        }
    );
}

#[test]
fn matcher_reuses_one_plan_across_sources() {
    let tpl = textured_template(9, 7, 5);
    let matcher = Matcher::new(tpl.view()).with_config(MatchConfig {
        min_threshold: 0.95,
        max_matches: 3,
        ..MatchConfig::default()
    });
    for (x0, y0) in [(0, 0), (13, 4), (33, 25)] {
        let source = embed(40, 30, 0, &tpl, &[(x0, y0)]);
        let matches = matcher.find_matches(source.view()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].center, Point::new(x0 + 3, y0 + 2));
        let located = matcher.best_position(source.view()).unwrap();
        assert!((located.x - (x0 as f32 + 3.5)).abs() < 1e-6);
        assert!((located.y - (y0 as f32 + 2.5)).abs() < 1e-6);
    }
}

#[test]
fn selector_runs_on_precomputed_surfaces() {
    let tpl = textured_template(12, 5, 5);
    let source = embed(40, 40, 0, &tpl, &[(3, 3), (30, 30)]);
    let plan = TemplatePlan::from_view(tpl.view());
    let surface = nccmatch::correlate(source.view(), &plan);

    let matches: Vec<Match> = select_matches(&surface, plan.size(), 0.9, 5);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].center, Point::new(5, 5));

    let token = CancelToken::new();
    let same = select_matches_cancellable(&surface, plan.size(), 0.9, 5, &token).unwrap();
    assert_eq!(same, matches);
    token.cancel();
    assert_eq!(
        select_matches_cancellable(&surface, plan.size(), 0.9, 5, &token),
        Err(NccMatchError::Cancelled)
    );
}

#[test]
fn empty_rasters_are_rejected_before_matching() {
    let empty: [u8; 0] = [];
    assert!(matches!(
        ImageView::from_slice(&empty, 0, 0),
        Err(NccMatchError::InvalidInput(_))
    ));
}
