//! Case registry.
//!
//! Each case pairs a query template with the scale values it is swept over.
//! Sweeps are handed to every case when it is registered; there is no shared
//! default that a case could mutate behind another's back.

use crate::session::Batch;
use std::fmt;

/// Loop and row counts used by every swept case unless it says otherwise.
pub const DEFAULT_LOOP_COUNTS: [i32; 1] = [1_000_000];

/// The select-increment case is swept more finely than the rest.
pub const SELECT_INCREMENT_LOOP_COUNTS: [i32; 3] = [100, 10_000, 1_000_000];

/// Statements per batch in the batched `select 1` case.
pub const BATCH_SIZE: i32 = 1_000_000;

/// Scale values for the standard suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweeps {
    /// Loop counts for the procedural loop cases, and row counts for the
    /// set-based call cases.
    pub loop_counts: Vec<i32>,
    pub select_increment_loop_counts: Vec<i32>,
    pub batch_size: i32,
}

impl Default for Sweeps {
    fn default() -> Self {
        Self {
            loop_counts: DEFAULT_LOOP_COUNTS.to_vec(),
            select_increment_loop_counts: SELECT_INCREMENT_LOOP_COUNTS.to_vec(),
            batch_size: BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleUnit {
    Loops,
    Rows,
    Queries,
}

impl fmt::Display for ScaleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleUnit::Loops => "loops",
            ScaleUnit::Rows => "rows",
            ScaleUnit::Queries => "queries",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub count: i32,
    pub unit: ScaleUnit,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

/// What a case sends to the server on each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// A query issued once per iteration. `$1`, when present, is bound to
    /// the scale count.
    Query(&'static str),
    /// A statement queued `count` times and sent as one batch per iteration.
    Batch(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCase {
    pub name: &'static str,
    pub template: Template,
    pub unit: ScaleUnit,
    /// Empty for unscaled cases.
    pub counts: Vec<i32>,
}

impl BenchCase {
    /// A query with no scale parameter.
    pub fn fixed(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            template: Template::Query(sql),
            unit: ScaleUnit::Queries,
            counts: Vec::new(),
        }
    }

    /// A query whose single `int4` parameter is swept over `counts`.
    pub fn swept(name: &'static str, sql: &'static str, unit: ScaleUnit, counts: &[i32]) -> Self {
        Self {
            name,
            template: Template::Query(sql),
            unit,
            counts: counts.to_vec(),
        }
    }

    pub fn batch(name: &'static str, statement: &'static str, size: i32) -> Self {
        Self {
            name,
            template: Template::Batch(statement),
            unit: ScaleUnit::Queries,
            counts: vec![size],
        }
    }

    /// One run per scale value, or a single run for unscaled cases.
    pub fn runs(&self) -> Vec<CaseRun> {
        if self.counts.is_empty() {
            return vec![CaseRun {
                case: self.name,
                template: self.template,
                scale: None,
            }];
        }
        self.counts
            .iter()
            .map(|&count| CaseRun {
                case: self.name,
                template: self.template,
                scale: Some(Scale {
                    count,
                    unit: self.unit,
                }),
            })
            .collect()
    }
}

/// A case bound to one scale value: the unit the harness times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseRun {
    pub case: &'static str,
    pub template: Template,
    pub scale: Option<Scale>,
}

impl CaseRun {
    /// `case` or `case/<count> <unit>`.
    pub fn id(&self) -> String {
        match self.scale {
            Some(scale) => format!("{}/{}", self.case, scale),
            None => self.case.to_string(),
        }
    }

    /// Build the execution plan. Batches are assembled here, so call this
    /// before starting any timer.
    pub fn plan(&self) -> Plan {
        match self.template {
            Template::Query(sql) => Plan::Query {
                sql: sql.to_string(),
                args: self.scale.map(|s| s.count).into_iter().collect(),
            },
            Template::Batch(statement) => {
                let size = self.scale.map_or(1, |s| s.count.max(0) as usize);
                Plan::Batch(Batch::repeat(statement, size))
            }
        }
    }
}

/// Prepared per-iteration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Query { sql: String, args: Vec<i32> },
    Batch(Batch),
}

/// Every case in the suite, with scale values taken from `sweeps`.
pub fn standard_suite(sweeps: &Sweeps) -> Vec<BenchCase> {
    let loops = &sweeps.loop_counts;
    vec![
        BenchCase::fixed("select_1", "select 1"),
        BenchCase::batch("batch_select", "select 1", sweeps.batch_size),
        BenchCase::swept(
            "plpgsql_loop_select",
            "select plpgsql_loop_n_select($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plpgsql_empty_loop",
            "select plpgsql_empty_loop_n($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plpgsql_loop_select_increment",
            "select plpgsql_loop_n_select_increment($1)",
            ScaleUnit::Loops,
            &sweeps.select_increment_loop_counts,
        ),
        BenchCase::swept(
            "plpgsql_loop_assign_increment",
            "select plpgsql_loop_n_assign_increment($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plperl_loop_increment",
            "select perl_loop_n_increment($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plpgsql_loop_call_plpgsql_add",
            "select plpgsql_loop_call_plpgsql_add($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plpgsql_loop_call_sql_add",
            "select plpgsql_loop_call_sql_add($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "plpgsql_loop_call_perl_add",
            "select plpgsql_loop_call_perl_add($1)",
            ScaleUnit::Loops,
            loops,
        ),
        BenchCase::swept(
            "select_call_plpgsql_add",
            "select plpgsql_add(n, 1) from generate_series(1, $1) n",
            ScaleUnit::Rows,
            loops,
        ),
        BenchCase::swept(
            "select_call_sql_add",
            "select sql_add(n, 1) from generate_series(1, $1) n",
            ScaleUnit::Rows,
            loops,
        ),
        BenchCase::swept(
            "select_call_perl_add",
            "select perl_add(n, 1) from generate_series(1, $1) n",
            ScaleUnit::Rows,
            loops,
        ),
    ]
}

/// Look a case up by name.
pub fn find<'a>(cases: &'a [BenchCase], name: &str) -> Option<&'a BenchCase> {
    cases.iter().find(|case| case.name == name)
}
