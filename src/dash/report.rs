// Markdown strategy briefing.

use std::fmt::Write;

use crate::dash::{
    config_reader::{EventReport, OutputSettings},
    *,
};

pub fn render_report(
    settings: &OutputSettings,
    dataset: &Dataset,
    names: &[String],
    events: Option<&EventReport>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {}", settings.dashboard_name)?;
    writeln!(out)?;
    if let Some(date) = &settings.report_date {
        writeln!(out, "**Date**: {}", date)?;
        writeln!(out)?;
    }

    let overview = dataset.overview(names);
    writeln!(out, "## Overview")?;
    writeln!(out)?;
    writeln!(out, "- Candidates: {}", overview.num_candidates)?;
    writeln!(out, "- Relationship records: {}", overview.num_relationships)?;
    writeln!(out, "- Average risk: {:.2}", overview.average_risk)?;
    writeln!(out, "- Average resilience: {:.2}", overview.average_resilience)?;
    if let Some(leader) = &overview.win_prob_leader {
        writeln!(out, "- Leader by win probability: {}", leader)?;
    }
    if let Some(leader) = &overview.influence_leader {
        writeln!(out, "- Leader by influence: {}", leader)?;
    }
    writeln!(out)?;

    writeln!(out, "## Candidates")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Candidate | Party | Support | Influence | Win prob. | Risk | Resilience |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    let mut stats: Vec<CandidateStats> = names.iter().map(|n| dataset.candidate_stats(n)).collect();
    stats.sort_by(|a, b| b.win_prob.cmp(&a.win_prob).then_with(|| a.name.cmp(&b.name)));
    for s in stats.iter() {
        writeln!(
            out,
            "| {} | {} | {:.1}% | {:.1} | {}% | {:.1} | {:.1} |",
            s.name, s.party, s.support, s.influence, s.win_prob, s.risk, s.resilience
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Regional dominance")?;
    writeln!(out)?;
    for d in dataset.regional_dominance() {
        match (&d.leader, d.scores.first()) {
            (Some(leader), Some((_, score))) => {
                writeln!(out, "- {}: {} ({:.3})", d.region, leader, score)?
            }
            _ => writeln!(out, "- {}: no data", d.region)?,
        }
    }
    writeln!(out)?;

    let ranking = dataset.stress_ranking();
    if !ranking.is_empty() {
        writeln!(out, "## Stress test")?;
        writeln!(out)?;
        for r in ranking {
            writeln!(
                out,
                "- {}: resilience {:.1}, risk {:.1}, critical scenario: {}",
                r.candidate, r.resilience_score, r.avg_risk, r.crit_scenario
            )?;
        }
        writeln!(out)?;
    }

    if let Some(events) = events {
        writeln!(out, "## Scenario events")?;
        writeln!(out)?;
        if !events.analysis.is_empty() {
            writeln!(out, "{}", events.analysis)?;
            writeln!(out)?;
        }
        writeln!(
            out,
            "| Candidate | Official | Private | Sentiment | Regional | Reason |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for i in events.impacts.iter() {
            writeln!(
                out,
                "| {} | {:+.2} | {:+.2} | {:+.2} | {:+.2} | {} |",
                i.candidate, i.official, i.private, i.sentiment, i.regional, i.reason
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Prescriptions")?;
    for s in stats.iter() {
        writeln!(out)?;
        writeln!(out, "### {}", s.name)?;
        writeln!(out)?;
        for p in dataset.prescriptions(&s.name) {
            writeln!(out, "- {}", p)?;
        }
        for scenario in CrisisScenario::ALL {
            let impact = dataset.crisis_impact(&s.name, scenario);
            writeln!(
                out,
                "- If {}: support {:.1}% -> {:.2}%, win probability {}% -> {}%",
                scenario.label(),
                impact.support_before,
                impact.support_after,
                impact.win_prob_before,
                impact.win_prob_after
            )?;
        }
    }
    Ok(out)
}
