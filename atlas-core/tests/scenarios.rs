use atlas_core::{
    aggregate, band, classify, compute_unit_score, matches, Band, Corpus, Engine, MatchStrategy,
    NarrationRecord, PathScore, SearchOptions, UnitAssessment,
};

fn path_scores(values: &[f64]) -> Vec<PathScore> {
    values.iter().map(|v| PathScore::new(*v).unwrap()).collect()
}

#[test]
fn short_reference_core_match() {
    assert!(matches(
        "إنما الأعمال بالنيات",
        "إنما الأعمال بالنيات وانما لكل امرئ ما نوى",
        &MatchStrategy::core()
    ));
}

#[test]
fn three_paths_score_strong() {
    let score = aggregate(&path_scores(&[9.0, 7.0, 5.0])).unwrap();
    assert!((score.value - 7.8).abs() < 1e-9);
    assert_eq!(band(score.value), Band::Strong);
    assert_eq!(band(score.value).label(), "strong");
}

#[test]
fn single_strong_path_scores_very_strong() {
    let score = aggregate(&path_scores(&[9.0])).unwrap();
    assert!((score.value - 9.2).abs() < 1e-9);
    assert_eq!(band(score.value), Band::VeryStrong);
}

#[test]
fn no_paths_refuses_to_render() {
    let score = aggregate(&[]);
    assert!(score.is_none());
    assert_eq!(classify(score.as_ref()), UnitAssessment::InsufficientData);
}

#[test]
fn search_then_score_end_to_end() {
    let engine = Engine::new(Corpus::new(vec![
        NarrationRecord::new(
            "niyyat",
            "bukhari",
            "1",
            "حَدَّثَنَا الحُمَيْدِيُّ عَبْدُ اللَّهِ بْنُ الزُّبَيْرِ، قَالَ: حَدَّثَنَا سُفْيَانُ",
            "إِنَّمَا الأَعْمَالُ بِالنِّيَّاتِ، وَإِنَّمَا لِكُلِّ امْرِئٍ مَا نَوَى",
        ),
        NarrationRecord::new(
            "niyyat",
            "muslim",
            "1907",
            "حدثنا عبد الله بن مسلمة بن قعنب، حدثنا مالك",
            "إنما الأعمال بالنية، وإنما لامرئ ما نوى",
        ),
        NarrationRecord::new(
            "niyyat",
            "bukhari",
            "54",
            "حدثنا الحميدي عبد الله بن الزبير قال حدثنا سفيان",
            "الأعمال بالنية، ولكل امرئ ما نوى",
        ),
        NarrationRecord::new(
            "kadhib",
            "bukhari",
            "110",
            "حدثنا موسى، قال: حدثنا أبو عوانة",
            "من كذب علي متعمدا فليتبوأ مقعده من النار",
        ),
    ]));

    let results = engine.search("إنما الأعمال\nمن كذب علي", &SearchOptions::default());
    assert_eq!(results.unit_count(), 2);

    let niyyat = engine.unit("niyyat").unwrap();
    assert_eq!(niyyat.paths.len(), 2);
    assert_eq!(niyyat.paths[0].records.len(), 2);

    let keyed: Vec<(&str, f64)> = niyyat
        .path_keys()
        .zip([9.0, 7.0])
        .collect();
    let score = compute_unit_score(keyed).unwrap().unwrap();
    // 0.6*9 + 0.3*8 + 0.1*2
    assert!((score.value - 8.0).abs() < 1e-9);
    assert_eq!(band(score.value), Band::Strong);
}
