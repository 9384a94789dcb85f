/*!

This is the long-form manual for `strategy_metrics` and `stratdash`.

## Input formats

Two static JSON documents are read, plus an optional event impact analysis.

### Roster

The polling roster. Either a bare array or an object with a `candidates` field:

```text
{ "candidates": [
    { "name": "신용한", "party": "더불어민주당", "poll_support": 9.6 },
    { "name": "노영민", "party": "더불어민주당", "poll_support": 8.0 }
] }
```

`poll_support` is a percentage in `[0, 100]`. Names must be unique.

### Evidence

The evidence bundle produced by the network analysis. All the sections are optional:

```text
{
  "centrality": [ { "이름": "신용한", "페이지랭크": "0.09", "매개중심성": "0.2", "종합점수": "0.85" } ],
  "relationships": [ { "person1": "신용한", "person2": "노영민", "relation_type": "경쟁",
                       "sentiment": "부정", "evidence": "...", "source_article": "...",
                       "date": "2026-01-15", "keyword": "..." } ],
  "regional": [ { "region": "청주", "candidate": "신용한", "final_score": 0.62 } ],
  "stress": [ { "candidate": "신용한", "Avg_Risk": 32, "Resilience_Score": 60,
                "Max_Vulnerability": 0.4, "Crit_Scenario": "조직 이탈" } ]
}
```

Numbers may be written as JSON numbers or as strings, since the bundle is
usually consolidated from CSV exports. The centrality columns also accept the
English names `name`, `pageRank`, `betweenness` and `compositeScore`.
Regions must be one of the eleven districts listed in [`crate::REGIONS`].

The bundle can be built from the CSV exports with `stratdash --consolidate <dir>`.
The directory is expected to contain:
* `centrality_scores.csv` (mandatory)
* `relationships_raw.csv` (mandatory)
* `regional_dominance_data.csv` (optional)
* `stress_test_summary.csv` (optional)

### Event impacts

The output of the event impact analysis, used by the briefing only. Deltas are
usually within `[-0.5, 0.5]`; missing deltas count as 0:

```text
{ "analysis": "가상 시나리오 분석: ...",
  "impact_matrix": {
    "신용한": { "official": 0.2, "private": 0.1, "sentiment": 0.4, "regional": 0.1,
               "reason": "이슈 주도권 확보" } } }
```

## Derived numbers

| field        | rule                                                               |
|--------------|--------------------------------------------------------------------|
| `influence`  | composite centrality x 100, or support x 4 (capped at 100)         |
| `winProb`    | round(support x 1.5 + page rank x 10 x 20), clamped to `[0, 99]`   |
| `risk`       | stress test average risk, or 50                                    |
| `resilience` | stress test resilience score, or 50                                |

Candidates missing from the roster get the record `party = 기타`, `support = 5.0`,
`winProb = 15`.

The weights are placeholder heuristics. They reproduce the numbers shown by the
dashboard and carry no statistical meaning.

## Configuration

`stratdash` comes with sensible defaults, but a run can be described by a JSON file
passed with `--config`:

```text
{
  "outputSettings": { "dashboardName": "2026 충북도지사 선거", "reportDate": "2026-02-15" },
  "dataSources": { "roster": "candidates.json", "evidence": "evidence_data.json",
                   "events": "event_impact_result.json" },
  "candidates": ["신용한", "노영민"],
  "scenario": "baseline"
}
```

Paths are relative to the configuration file. When `outputSettings.outputDirectory`
is set and `--out` is not, the output is written to `summary.json` (or the name of
the view, or `report.md`) in that directory. Command line flags override the
values of the configuration file. When no candidates are selected, the whole
roster is used.

Scenarios:
- `baseline`: the plain support series
- `unification`: from the seventh month, same-party candidates consolidate behind
  their best-supported member
- `scandal:<name>`: from the seventh month, the named candidate takes the loss of
  a scandal (see the crisis simulator)

 */
