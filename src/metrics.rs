use std::collections::BTreeMap;

use crate::models::{CategoryMetrics, MetricsSnapshot, Outcome, Record, Table};

#[derive(Default)]
struct Tally {
    success: usize,
    fail: usize,
    total: usize,
}

impl Tally {
    fn add(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success => self.success += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Unrecognized(_) => {}
        }
    }
}

pub fn compute(table: &Table) -> MetricsSnapshot {
    compute_records(&table.records)
}

pub fn compute_records(records: &[Record]) -> MetricsSnapshot {
    let mut overall = Tally::default();
    let mut by_category: BTreeMap<String, Tally> = BTreeMap::new();

    for record in records {
        overall.add(&record.outcome);
        by_category
            .entry(record.category.clone())
            .or_default()
            .add(&record.outcome);
    }

    let per_category = by_category
        .into_iter()
        .map(|(category, tally)| {
            (
                category,
                CategoryMetrics {
                    success_count: tally.success,
                    fail_count: tally.fail,
                    total_count: tally.total,
                    success_rate: rate(tally.success, tally.total),
                },
            )
        })
        .collect();

    MetricsSnapshot {
        total: overall.total,
        success_count: overall.success,
        fail_count: overall.fail,
        unrecognized_count: overall.total - overall.success - overall.fail,
        success_rate: rate(overall.success, overall.success + overall.fail),
        per_category,
    }
}

/// `success / total`, defined as 0 for an empty denominator.
pub fn rate(success: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        success as f64 / total as f64
    }
}

pub fn filter<'a>(
    table: &'a Table,
    category: Option<&'a str>,
    outcome: Option<&'a Outcome>,
) -> impl Iterator<Item = &'a Record> + 'a {
    table.records.iter().filter(move |record| {
        category.map_or(true, |c| record.category == c)
            && outcome.map_or(true, |o| &record.outcome == o)
    })
}
