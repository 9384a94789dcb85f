use log::warn;

pub use crate::config::*;
use crate::Dataset;

/// A builder for assembling a dataset.
///
/// All the records are validated when they are added, so a built `Dataset`
/// never contains non-finite numbers, duplicate candidates or unknown regions.
///
/// ```
/// pub use strategy_metrics::builder::Builder;
/// pub use strategy_metrics::Candidate;
/// # use strategy_metrics::DashboardErrors;
///
/// let mut builder = Builder::new().candidates(&[Candidate {
///     name: "Anna".to_string(),
///     party: "Blue".to_string(),
///     poll_support: 12.0,
/// }])?;
///
/// builder.add_regional_score("청주", "Anna", 0.4)?;
/// let dataset = builder.build();
/// assert_eq!(dataset.candidates().len(), 1);
///
/// # Ok::<(), DashboardErrors>(())
/// ```
#[derive(Default)]
pub struct Builder {
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _centrality: Vec<CentralityRecord>,
    pub(crate) _relationships: Vec<RelationshipRecord>,
    pub(crate) _regional: Vec<RegionalScore>,
    pub(crate) _stress: Vec<StressRecord>,
    pub(crate) _rules: StatsRules,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn rules(self, rules: &StatsRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            ..self
        }
    }

    /// Replaces the roster.
    pub fn candidates(self, cands: &[Candidate]) -> Result<Builder, DashboardErrors> {
        let mut res = Builder {
            _candidates: Vec::new(),
            ..self
        };
        for c in cands {
            res.add_candidate(c.clone())?;
        }
        Ok(res)
    }

    pub fn add_candidate(&mut self, candidate: Candidate) -> Result<(), DashboardErrors> {
        check_name(&candidate.name)?;
        check_finite(&candidate.name, "poll_support", candidate.poll_support)?;
        if !(0.0..=100.0).contains(&candidate.poll_support) {
            return Err(DashboardErrors::InvalidSupport {
                name: candidate.name.clone(),
                value: candidate.poll_support,
            });
        }
        if self._candidates.iter().any(|c| c.name == candidate.name) {
            return Err(DashboardErrors::DuplicateCandidate(candidate.name));
        }
        self._candidates.push(candidate);
        Ok(())
    }

    pub fn add_centrality(&mut self, record: CentralityRecord) -> Result<(), DashboardErrors> {
        check_name(&record.name)?;
        check_finite(&record.name, "page_rank", record.page_rank)?;
        check_finite(&record.name, "betweenness", record.betweenness)?;
        check_finite(&record.name, "composite_score", record.composite_score)?;
        if self._centrality.iter().any(|r| r.name == record.name) {
            // Lookups use the first record.
            warn!("add_centrality: duplicate record for {}, ignored", record.name);
            return Ok(());
        }
        self._centrality.push(record);
        Ok(())
    }

    pub fn add_relationship(&mut self, record: RelationshipRecord) -> Result<(), DashboardErrors> {
        check_name(&record.person1)?;
        check_name(&record.person2)?;
        self._relationships.push(record);
        Ok(())
    }

    pub fn add_regional_score(
        &mut self,
        region: &str,
        candidate: &str,
        final_score: f64,
    ) -> Result<(), DashboardErrors> {
        check_name(candidate)?;
        check_finite(candidate, "final_score", final_score)?;
        if !REGIONS.contains(&region) {
            return Err(DashboardErrors::UnknownRegion(region.to_string()));
        }
        self._regional.push(RegionalScore {
            region: region.to_string(),
            candidate: candidate.to_string(),
            final_score,
        });
        Ok(())
    }

    pub fn add_stress(&mut self, record: StressRecord) -> Result<(), DashboardErrors> {
        check_name(&record.candidate)?;
        check_finite(&record.candidate, "avg_risk", record.avg_risk)?;
        check_finite(&record.candidate, "resilience_score", record.resilience_score)?;
        check_finite(&record.candidate, "max_vulnerability", record.max_vulnerability)?;
        if self._stress.iter().any(|r| r.candidate == record.candidate) {
            warn!("add_stress: duplicate record for {}, ignored", record.candidate);
            return Ok(());
        }
        self._stress.push(record);
        Ok(())
    }

    pub fn build(self) -> Dataset {
        Dataset {
            candidates: self._candidates,
            centrality: self._centrality,
            relationships: self._relationships,
            regional: self._regional,
            stress: self._stress,
            rules: self._rules,
        }
    }
}

fn check_name(name: &str) -> Result<(), DashboardErrors> {
    if name.trim().is_empty() {
        Err(DashboardErrors::EmptyName)
    } else {
        Ok(())
    }
}

fn check_finite(name: &str, field: &'static str, value: f64) -> Result<(), DashboardErrors> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DashboardErrors::NonFiniteValue {
            name: name.to_string(),
            field,
        })
    }
}
