//! Pooled response over groups of independent series (e.g. trading days).
//!
//! Each group contributes its raw lagged sums `sum_t eps(t) r(t+l)`, computed
//! strictly inside the group. The sums are added across groups and divided by
//! the total number of observations before cumulating into the response, so a
//! group with more or larger events weighs proportionally more. Averaging the
//! per-group normalized responses would weigh a short quiet day like a long
//! busy one.

use rayon::prelude::*;

use crate::domain::{DEFAULT_GROUP_COLUMN, Response, Table};
use crate::error::{PropagatorError, Result, ensure_len};
use crate::response::lagged::{lag_axis, lagged_sums, response_from_cross};

/// One group's output and innovation series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    pub r: Vec<f64>,
    pub eps: Vec<f64>,
}

/// Pooled response over `groups`; `maxlag` defaults to half the longest group.
pub fn response_pooled(groups: &[GroupSeries], maxlag: Option<usize>) -> Result<Response> {
    for g in groups {
        ensure_len("eps", g.r.len(), g.eps.len())?;
    }
    let total: usize = groups.iter().map(|g| g.r.len()).sum();
    if total == 0 {
        return Err(PropagatorError::NotEnoughData(
            "grouped response needs at least one observation.".into(),
        ));
    }
    let longest = groups.iter().map(|g| g.r.len()).max().unwrap_or(0);
    let maxlag = maxlag.unwrap_or(longest / 2);
    if maxlag > longest {
        return Err(PropagatorError::NotEnoughData(format!(
            "maxlag={maxlag} exceeds the longest group ({longest} observations)."
        )));
    }

    let per_group: Vec<Vec<f64>> = groups
        .par_iter()
        .map(|g| lagged_sums(&g.r, &g.eps, maxlag))
        .collect();

    // Sequential reduction keeps the result independent of thread scheduling.
    let mut sums = vec![0.0; 2 * maxlag + 1];
    for group_sums in &per_group {
        for (acc, v) in sums.iter_mut().zip(group_sums) {
            *acc += v;
        }
    }

    let scale = 1.0 / total as f64;
    let cross: Vec<f64> = sums.into_iter().map(|v| v * scale).collect();
    let response = response_from_cross(&cross);
    log::debug!(
        "pooled response: {} groups, {total} observations, maxlag={maxlag}",
        groups.len()
    );

    Ok(Response {
        lags: lag_axis(maxlag),
        cross,
        response,
    })
}

/// Split a table into per-group series of the `[r_col, eps_col]` columns.
pub fn group_series(table: &Table, columns: [&str; 2], group_col: &str) -> Result<Vec<GroupSeries>> {
    let [r_col, eps_col] = columns;
    let r = table.numeric_column(r_col)?;
    let eps = table.numeric_column(eps_col)?;
    let groups = table.group_rows(group_col)?;

    Ok(groups
        .into_values()
        .map(|rows| GroupSeries {
            r: rows.iter().map(|&i| r[i]).collect(),
            eps: rows.iter().map(|&i| eps[i]).collect(),
        })
        .collect())
}

/// Pooled response of column `columns[0]` (output) to `columns[1]`
/// (innovation), grouped by `group_col`.
pub fn response_grouped_df(table: &Table, columns: [&str; 2], group_col: &str) -> Result<Response> {
    response_pooled(&group_series(table, columns, group_col)?, None)
}

/// [`response_grouped_df`] with the default group column and an explicit window.
pub fn response_grouped_by_date(table: &Table, columns: [&str; 2], maxlag: usize) -> Result<Response> {
    response_pooled(&group_series(table, columns, DEFAULT_GROUP_COLUMN)?, Some(maxlag))
}
