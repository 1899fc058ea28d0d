use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Cost value as it arrives over the wire. Backends and CSV sources are not
/// consistent about numeric typing, so a cost may be a number, a numeric
/// string, or absent. Coercion to f64 happens in exactly one place.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CostField {
    Number(f64),
    Text(String),
    Missing,
}

impl Default for CostField {
    fn default() -> Self {
        CostField::Missing
    }
}

impl CostField {
    /// Unparsable or absent values count as zero, never as an error.
    pub fn as_f64(&self) -> f64 {
        match self {
            CostField::Number(n) => *n,
            CostField::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CostField::Missing => 0.0,
        }
    }
}

impl From<f64> for CostField {
    fn from(value: f64) -> Self {
        CostField::Number(value)
    }
}

/// One optimization decision row. Server-assigned ids are non-negative;
/// negative ids mark drafts that have not been persisted yet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub id: i64,
    pub run_id: String,
    pub run_timestamp: DateTime<Utc>,
    pub project_id: i32,
    pub item_code: String,
    pub procurement_option_id: i32,
    pub purchase_time: i32,
    pub delivery_time: i32,
    pub quantity: f64,
    #[serde(default)]
    pub final_cost: CostField,
}

/// Seed values for a freshly added draft, typically taken from the first
/// available procurement option for the item being added.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DraftDefaults {
    pub project_id: i32,
    pub item_code: String,
    pub procurement_option_id: i32,
    pub purchase_time: i32,
    pub delivery_time: i32,
    pub quantity: f64,
    pub final_cost: f64,
}

/// Effective view of one optimization run after removals, overlays and drafts
/// have been applied to the server baseline.
#[derive(Serialize, Clone, Debug)]
pub struct RunGroup {
    pub records: Vec<ResultRecord>,
    pub total_cost: f64,
    pub has_edits: bool,
    pub run_timestamp: DateTime<Utc>,
}

impl RunGroup {
    fn new(run_timestamp: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            total_cost: 0.0,
            has_edits: false,
            run_timestamp,
        }
    }
}

/// Unsaved local changes against a server-supplied result set: full-record
/// edits keyed by id, ids marked for removal, and locally drafted rows.
/// Server state is never touched here; `reconcile` is a pure projection and
/// the save round-trip belongs to the caller.
#[derive(Debug, Clone, Default)]
pub struct DraftPlan {
    overlay: HashMap<i64, ResultRecord>,
    removed: HashSet<i64>,
    drafts: Vec<ResultRecord>,
    next_draft_id: i64,
}

impl DraftPlan {
    pub fn new() -> Self {
        Self {
            overlay: HashMap::new(),
            removed: HashSet::new(),
            drafts: Vec::new(),
            next_draft_id: -1,
        }
    }

    /// Store a full replacement record for `id`. A second edit of the same id
    /// overwrites the first; edits never stack.
    pub fn apply_edit(&mut self, id: i64, record: ResultRecord) {
        self.overlay.insert(id, record);
    }

    /// Exclude `id` from the effective set. Idempotent, and a no-op for ids
    /// that no longer exist in the baseline.
    pub fn mark_removed(&mut self, id: i64) {
        self.removed.insert(id);
    }

    /// Create a draft row for `run_id` with a fresh negative placeholder id,
    /// strictly below every id issued so far in this session. The record is
    /// returned so the caller can route it into an edit dialog.
    pub fn add_draft(&mut self, run_id: &str, defaults: &DraftDefaults) -> ResultRecord {
        let record = ResultRecord {
            id: self.next_draft_id,
            run_id: run_id.to_string(),
            run_timestamp: Utc::now(),
            project_id: defaults.project_id,
            item_code: defaults.item_code.clone(),
            procurement_option_id: defaults.procurement_option_id,
            purchase_time: defaults.purchase_time,
            delivery_time: defaults.delivery_time,
            quantity: defaults.quantity,
            final_cost: CostField::Number(defaults.final_cost),
        };
        self.next_draft_id -= 1;
        self.drafts.push(record.clone());
        record
    }

    /// One dialog-save entry point for both flows: a negative id not yet in
    /// the draft list is appended as a new draft, anything else is an edit of
    /// an existing record. The branch depends only on the sign of the id.
    pub fn commit_draft(&mut self, record: ResultRecord) {
        if record.id < 0 && !self.drafts.iter().any(|d| d.id == record.id) {
            // Keep the placeholder sequence below externally supplied ids.
            if record.id <= self.next_draft_id {
                self.next_draft_id = record.id - 1;
            }
            self.drafts.push(record);
        } else {
            self.apply_edit(record.id, record);
        }
    }

    pub fn has_local_changes(&self) -> bool {
        !self.overlay.is_empty() || !self.removed.is_empty() || !self.drafts.is_empty()
    }

    /// Project local state over `server`, grouping by run id.
    ///
    /// Server records keep their fetch order and come first in each group,
    /// drafts follow in addition order. A draft only becomes visible once the
    /// baseline contains at least one record for its run; until then it is
    /// carried but not shown.
    pub fn reconcile(&self, server: &[ResultRecord]) -> IndexMap<String, RunGroup> {
        // Representative timestamp per run, from the first baseline record
        // regardless of removal state.
        let mut known_runs: IndexMap<&str, DateTime<Utc>> = IndexMap::new();
        for record in server {
            known_runs
                .entry(record.run_id.as_str())
                .or_insert(record.run_timestamp);
        }

        let mut groups: IndexMap<String, RunGroup> = IndexMap::new();

        for record in server {
            if self.removed.contains(&record.id) {
                continue;
            }
            let effective = self.overlay.get(&record.id).unwrap_or(record).clone();
            let timestamp = known_runs
                .get(effective.run_id.as_str())
                .copied()
                .unwrap_or(record.run_timestamp);
            let group = groups
                .entry(effective.run_id.clone())
                .or_insert_with(|| RunGroup::new(timestamp));
            group.total_cost += effective.final_cost.as_f64();
            if self.overlay.contains_key(&effective.id) {
                group.has_edits = true;
            }
            group.records.push(effective);
        }

        for draft in &self.drafts {
            let Some(timestamp) = known_runs.get(draft.run_id.as_str()) else {
                continue;
            };
            let group = groups
                .entry(draft.run_id.clone())
                .or_insert_with(|| RunGroup::new(*timestamp));
            group.total_cost += draft.final_cost.as_f64();
            group.records.push(draft.clone());
        }

        groups
    }

    /// Drop local state for one run after a successful save: its drafts, and
    /// overlay/removal entries that refer to the run's baseline ids.
    pub fn clear_run(&mut self, run_id: &str, server: &[ResultRecord]) {
        let run_record_ids: HashSet<i64> = server
            .iter()
            .filter(|r| r.run_id == run_id)
            .map(|r| r.id)
            .collect();

        self.drafts.retain(|d| d.run_id != run_id);
        self.overlay
            .retain(|id, record| !run_record_ids.contains(id) && record.run_id != run_id);
        self.removed.retain(|id| !run_record_ids.contains(id));
    }
}

/// Run ids ordered by descending run timestamp; encounter order breaks ties.
pub fn runs_by_recency(groups: &IndexMap<String, RunGroup>) -> Vec<String> {
    let mut runs: Vec<(String, DateTime<Utc>)> = groups
        .iter()
        .map(|(run_id, group)| (run_id.clone(), group.run_timestamp))
        .collect();
    runs.sort_by(|a, b| b.1.cmp(&a.1));
    runs.into_iter().map(|(run_id, _)| run_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn record(id: i64, run_id: &str, cost: CostField) -> ResultRecord {
        ResultRecord {
            id,
            run_id: run_id.to_string(),
            run_timestamp: ts(1_000),
            project_id: 1,
            item_code: format!("ITM-{}", id.abs()),
            procurement_option_id: 10,
            purchase_time: 1,
            delivery_time: 2,
            quantity: 1.0,
            final_cost: cost,
        }
    }

    fn baseline() -> Vec<ResultRecord> {
        vec![
            record(1, "R1", CostField::Text("100".to_string())),
            record(2, "R1", CostField::Text("200".to_string())),
        ]
    }

    #[test]
    fn reconcile_passes_baseline_through() {
        let plan = DraftPlan::new();
        let groups = plan.reconcile(&baseline());
        assert_eq!(groups.len(), 1);
        let group = &groups["R1"];
        assert_eq!(group.records.len(), 2);
        assert_eq!(group.total_cost, 300.0);
        assert!(!group.has_edits);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut once = DraftPlan::new();
        once.mark_removed(1);
        let mut twice = DraftPlan::new();
        twice.mark_removed(1);
        twice.mark_removed(1);

        let a = once.reconcile(&baseline());
        let b = twice.reconcile(&baseline());
        assert_eq!(a["R1"].records, b["R1"].records);
        assert_eq!(a["R1"].total_cost, b["R1"].total_cost);
    }

    #[test]
    fn overlay_takes_precedence_over_baseline() {
        let mut plan = DraftPlan::new();
        let mut edited = record(2, "R1", CostField::Number(250.0));
        edited.quantity = 5.0;
        plan.apply_edit(2, edited.clone());

        let groups = plan.reconcile(&baseline());
        let group = &groups["R1"];
        assert!(group.has_edits);
        let returned = group.records.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(returned, &edited);
    }

    #[test]
    fn second_edit_overwrites_first() {
        let mut plan = DraftPlan::new();
        plan.apply_edit(2, record(2, "R1", CostField::Number(999.0)));
        plan.apply_edit(2, record(2, "R1", CostField::Number(250.0)));

        let groups = plan.reconcile(&baseline());
        assert_eq!(groups["R1"].total_cost, 100.0 + 250.0);
    }

    #[test]
    fn removal_excludes_regardless_of_edit_order() {
        let mut edit_then_remove = DraftPlan::new();
        edit_then_remove.apply_edit(1, record(1, "R1", CostField::Number(999.0)));
        edit_then_remove.mark_removed(1);

        let mut remove_then_edit = DraftPlan::new();
        remove_then_edit.mark_removed(1);
        remove_then_edit.apply_edit(1, record(1, "R1", CostField::Number(999.0)));

        for plan in [&edit_then_remove, &remove_then_edit] {
            let groups = plan.reconcile(&baseline());
            assert!(groups["R1"].records.iter().all(|r| r.id != 1));
            assert_eq!(groups["R1"].total_cost, 200.0);
        }
    }

    #[test]
    fn draft_visible_only_when_run_exists_in_baseline() {
        let mut plan = DraftPlan::new();
        plan.add_draft("R9", &DraftDefaults::default());

        let groups = plan.reconcile(&baseline());
        assert!(!groups.contains_key("R9"));

        // The same draft surfaces once the baseline knows the run.
        let mut server = baseline();
        server.push(record(3, "R9", CostField::Number(10.0)));
        let groups = plan.reconcile(&server);
        assert_eq!(groups["R9"].records.len(), 2);
    }

    #[test]
    fn draft_survives_removal_of_whole_run() {
        let mut plan = DraftPlan::new();
        plan.add_draft("R1", &DraftDefaults {
            final_cost: 50.0,
            ..DraftDefaults::default()
        });
        plan.mark_removed(1);
        plan.mark_removed(2);

        // Visibility keys off the raw baseline, not the surviving members.
        let groups = plan.reconcile(&baseline());
        assert_eq!(groups["R1"].records.len(), 1);
        assert_eq!(groups["R1"].total_cost, 50.0);
    }

    #[test]
    fn total_cost_matches_independent_resum() {
        let mut plan = DraftPlan::new();
        plan.apply_edit(2, record(2, "R1", CostField::Text("not-a-number".to_string())));
        plan.add_draft("R1", &DraftDefaults {
            final_cost: 17.25,
            ..DraftDefaults::default()
        });

        let groups = plan.reconcile(&baseline());
        for group in groups.values() {
            let resum: f64 = group.records.iter().map(|r| r.final_cost.as_f64()).sum();
            assert!((group.total_cost - resum).abs() < 1e-9);
        }
    }

    #[test]
    fn malformed_cost_coerces_to_zero() {
        assert_eq!(CostField::Text("12.5".to_string()).as_f64(), 12.5);
        assert_eq!(CostField::Text(" 40 ".to_string()).as_f64(), 40.0);
        assert_eq!(CostField::Text("garbage".to_string()).as_f64(), 0.0);
        assert_eq!(CostField::Text(String::new()).as_f64(), 0.0);
        assert_eq!(CostField::Missing.as_f64(), 0.0);
    }

    #[test]
    fn draft_ids_are_unique_and_strictly_decreasing() {
        let mut plan = DraftPlan::new();
        let defaults = DraftDefaults::default();
        let ids: Vec<i64> = (0..5).map(|_| plan.add_draft("R1", &defaults).id).collect();
        assert_eq!(ids, vec![-1, -2, -3, -4, -5]);

        // Committing a foreign draft id pushes the sequence further down.
        plan.commit_draft(record(-10, "R1", CostField::Number(1.0)));
        assert_eq!(plan.add_draft("R1", &defaults).id, -11);
    }

    #[test]
    fn commit_draft_branches_on_id_sign() {
        let mut plan = DraftPlan::new();

        // Negative and unknown: appended as a draft.
        plan.commit_draft(record(-1, "R1", CostField::Number(50.0)));
        let groups = plan.reconcile(&baseline());
        assert_eq!(groups["R1"].records.len(), 3);

        // Non-negative: routed to the edit overlay.
        plan.commit_draft(record(2, "R1", CostField::Number(250.0)));
        let groups = plan.reconcile(&baseline());
        assert!(groups["R1"].has_edits);
        assert_eq!(groups["R1"].total_cost, 100.0 + 250.0 + 50.0);
    }

    #[test]
    fn edit_plus_draft_scenario() {
        let mut plan = DraftPlan::new();
        plan.apply_edit(2, record(2, "R1", CostField::Number(250.0)));
        let draft = plan.add_draft("R1", &DraftDefaults {
            final_cost: 50.0,
            ..DraftDefaults::default()
        });
        assert_eq!(draft.id, -1);

        let groups = plan.reconcile(&baseline());
        assert_eq!(groups.len(), 1);
        let group = &groups["R1"];
        assert_eq!(group.records.len(), 3);
        assert_eq!(group.total_cost, 400.0);

        // Continuation: removing the untouched record drops its cost share.
        plan.mark_removed(1);
        let groups = plan.reconcile(&baseline());
        let group = &groups["R1"];
        assert_eq!(group.records.len(), 2);
        assert_eq!(group.total_cost, 300.0);
    }

    #[test]
    fn runs_ordered_by_recency_with_stable_ties() {
        let mut server = Vec::new();
        let mut old = record(1, "R-old", CostField::Number(1.0));
        old.run_timestamp = ts(100);
        let mut new = record(2, "R-new", CostField::Number(1.0));
        new.run_timestamp = ts(900);
        let mut tie_a = record(3, "R-tie-a", CostField::Number(1.0));
        tie_a.run_timestamp = ts(500);
        let mut tie_b = record(4, "R-tie-b", CostField::Number(1.0));
        tie_b.run_timestamp = ts(500);
        server.extend([old, new, tie_a, tie_b]);

        let plan = DraftPlan::new();
        let groups = plan.reconcile(&server);
        assert_eq!(
            runs_by_recency(&groups),
            vec!["R-new", "R-tie-a", "R-tie-b", "R-old"]
        );
    }

    #[test]
    fn clear_run_purges_only_that_run() {
        let mut server = baseline();
        server.push(record(7, "R2", CostField::Number(30.0)));

        let mut plan = DraftPlan::new();
        plan.apply_edit(1, record(1, "R1", CostField::Number(110.0)));
        plan.mark_removed(2);
        plan.add_draft("R1", &DraftDefaults::default());
        plan.apply_edit(7, record(7, "R2", CostField::Number(35.0)));

        plan.clear_run("R1", &server);

        let groups = plan.reconcile(&server);
        assert_eq!(groups["R1"].records.len(), 2);
        assert!(!groups["R1"].has_edits);
        assert_eq!(groups["R1"].total_cost, 300.0);
        // R2 edits untouched.
        assert_eq!(groups["R2"].total_cost, 35.0);
        assert!(plan.has_local_changes());
    }
}
