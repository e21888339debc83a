use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::matching::scoring::compute_match;
use crate::matching::skills::MatchParams;
use crate::{Job, MatchResult, Profile};

/// All match results for one profile, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMatches {
    pub profile_name: String,
    pub matches: Vec<MatchResult>,
}

/// Score one profile against every job and rank descending. The sort is
/// stable, so jobs with equal scores keep their input order.
pub fn rank_jobs(profile: &Profile, jobs: &[Job], params: &MatchParams) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = jobs
        .iter()
        .map(|job| compute_match(profile, job, params))
        .collect();

    matches.sort_by(|a, b| {
        b.overall_match
            .partial_cmp(&a.overall_match)
            .unwrap_or(Ordering::Equal)
    });

    matches
}

/// Batch fan-out: every profile × every job. Each pair is computed
/// independently; results are grouped per profile in input order.
pub fn batch_match(profiles: &[Profile], jobs: &[Job], params: &MatchParams) -> Vec<ProfileMatches> {
    profiles
        .iter()
        .map(|profile| ProfileMatches {
            profile_name: profile.identity.name.clone(),
            matches: rank_jobs(profile, jobs, params),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProfileIdentity, Skill};

    fn profile(name: &str, skills: &[&str]) -> Profile {
        Profile {
            identity: ProfileIdentity {
                name: name.into(),
                ..Default::default()
            },
            skills: skills.iter().map(|s| Skill::presence(*s)).collect(),
            ..Default::default()
        }
    }

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
    fn ranks_jobs_by_descending_match() {
        let p = profile("P", &["python", "sql"]);
        let j1 = job("J1", &[("python", 1.0), ("sql", 0.8)]);
        let j2 = job("J2", &[("java", 1.0)]);

        let ranked = rank_jobs(&p, &[j2, j1], &MatchParams::default());

        assert_eq!(ranked[0].job_title, "J1");
        assert_eq!(ranked[0].overall_match, 100.0);
        assert_eq!(ranked[1].job_title, "J2");
        assert_eq!(ranked[1].overall_match, 0.0);
        assert_eq!(ranked[1].missing_skills, vec!["java".to_string()]);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let p = profile("P", &["rust"]);
        let jobs = vec![
            job("first", &[("rust", 1.0)]),
            job("second", &[("rust", 1.0)]),
        ];

        let ranked = rank_jobs(&p, &jobs, &MatchParams::default());
        assert_eq!(ranked[0].job_title, "first");
        assert_eq!(ranked[1].job_title, "second");
    }

    #[test]
    fn batch_groups_results_per_profile() {
        let profiles = vec![profile("A", &["python"]), profile("B", &["java"])];
        let jobs = vec![job("J", &[("python", 1.0)])];

        let results = batch_match(&profiles, &jobs, &MatchParams::default());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].profile_name, "A");
        assert_eq!(results[0].matches[0].overall_match, 100.0);
        assert_eq!(results[1].profile_name, "B");
        assert_eq!(results[1].matches[0].overall_match, 0.0);
    }
}
