//! End-to-end scenarios over the public API: raw records in, ranked and
//! explained match results out.

use serde_json::json;

use dm_common::config::EngineConfig;
use dm_common::matching::{batch_match, MatchParams};
use dm_common::service::MatchService;
use dm_common::skill_normalizer::normalize_skill;
use dm_common::{Job, Platform, Profile, Skill};

fn job(title: &str, requirements: &[(&str, f64)]) -> Job {
    Job {
        title: title.into(),
        company: "Acme".into(),
        requirements: requirements
            .iter()
            .map(|(name, importance)| Skill::new(*name, *importance))
            .collect(),
        ..Default::default()
    }
}

#[test]
fn batch_ranking_scenario() {
    let profile = Profile::from_record(&json!({
        "name": "P",
        "skills": ["python", "sql"],
    }));

    let j1 = job("J1", &[("python", 1.0), ("sql", 0.8)]);
    let j2 = job("J2", &[("java", 1.0)]);

    let results = batch_match(&[profile], &[j2, j1], &MatchParams::default());

    let matches = &results[0].matches;
    assert_eq!(matches[0].job_title, "J1");
    assert_eq!(matches[0].overall_match, 100.0);
    assert_eq!(matches[1].job_title, "J2");
    assert_eq!(matches[1].overall_match, 0.0);
    assert_eq!(matches[1].missing_skills, vec!["java".to_string()]);
}

#[test]
fn expert_candidate_gets_full_credit() {
    let profile = Profile::from_record(&json!({
        "name": "P",
        "skills": [ { "name": "Python", "level": "expert" } ],
    }));
    let job = job("Backend", &[("Python", 0.9)]);

    let results = batch_match(
        &[profile],
        std::slice::from_ref(&job),
        &MatchParams::default(),
    );
    let top = &results[0].matches[0];

    assert_eq!(top.overall_match, 100.0);
    assert_eq!(
        top.recommendation,
        "Excellent match - Highly recommended for this position"
    );
}

#[test]
fn intermediate_candidate_gets_weighted_partial_credit() {
    let profile = Profile::from_record(&json!({
        "skills": [ { "name": "react", "level": "intermediate" } ],
    }));
    let job = job("Frontend", &[("React", 1.0)]);

    let results = batch_match(
        &[profile],
        std::slice::from_ref(&job),
        &MatchParams::default(),
    );
    let top = &results[0].matches[0];

    assert_eq!(top.overall_match, 70.0);
    assert_eq!(top.skill_matches[0].match_score, 0.7);
    assert_eq!(
        top.recommendation,
        "Good match - Strong candidate for this position"
    );
}

#[test]
fn normalization_drives_cross_platform_matching() {
    // Aliases written four different ways all collapse onto one key.
    for alias in ["JS", "Javascript", "ECMAScript's javascript language"] {
        assert_eq!(normalize_skill(alias), "javascript");
    }

    let profile = Profile::from_record(&json!({ "skills": ["JS"] }));
    let job = job("Frontend", &[("JavaScript", 1.0)]);

    let results = batch_match(
        &[profile],
        std::slice::from_ref(&job),
        &MatchParams::default(),
    );
    assert_eq!(results[0].matches[0].overall_match, 100.0);
}

#[test]
fn match_results_serialize_deterministically() {
    let profile = Profile::from_record(&json!({
        "name": "P",
        "skills": ["python", "machine learning", "sql"],
    }));
    let jobs = vec![
        job("J1", &[("Python", 1.0), ("ML", 0.8)]),
        job("J2", &[("Rust", 1.0)]),
    ];

    let first = batch_match(std::slice::from_ref(&profile), &jobs, &MatchParams::default());
    let second = batch_match(std::slice::from_ref(&profile), &jobs, &MatchParams::default());

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn full_pipeline_from_raw_records() {
    dm_common::logging::install_tracing_panic_hook("dm-tests");
    dm_common::logging::init_tracing_subscriber("dm-tests");
    let service = MatchService::from_config(EngineConfig::default()).await;

    service
        .process_profile(
            Platform::Github,
            "p",
            &json!({
                "name": "P",
                "bio": "python sql pipelines",
                "skills": ["python", "sql"],
            }),
        )
        .await;

    service
        .process_job(&json!({
            "title": "J1",
            "company": "Acme",
            "description": "python sql pipelines",
            "skills": [
                { "name": "python", "importance": 1.0 },
                { "name": "sql", "importance": 0.8 },
            ],
        }))
        .await;
    service
        .process_job(&json!({
            "title": "J2",
            "company": "Acme",
            "skills": [ { "name": "java", "importance": 1.0 } ],
        }))
        .await;

    let ranked = service
        .match_profile_to_jobs(Platform::Github, "p", None, 10)
        .await;

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].job.title, "J1");
    assert!((ranked[0].skill_overlap_pct - 1.0).abs() < 1e-9);
    assert_eq!(ranked[1].job.title, "J2");
    assert_eq!(ranked[1].skill_overlap_pct, 0.0);
    assert!(ranked[0].combined_score > ranked[1].combined_score);
}
