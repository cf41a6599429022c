// ─────────────────────────────────────────────────────────────────────
// SCPN MRI Toolkit — Protocol
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Column-oriented diffusion acquisition protocol.
//!
//! One row per acquired volume, SI units throughout. Columns that were not
//! supplied (`b`, `G`, `Delta`, `delta`) are derived from the others on demand.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{concatenate, Array1, Array2, Axis, Zip};

use mri_types::config::ProtocolConfig;
use mri_types::error::{MriError, MriResult};

use crate::timings;

/// Named protocol columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Gradient amplitude [T/m]
    G,
    /// Gradient separation [s]
    BigDelta,
    /// Gradient duration [s]
    SmallDelta,
    /// b-value [s/m^2]
    B,
    /// Scanner maximum gradient amplitude [T/m]
    MaxG,
    /// Echo time [s]
    Te,
    /// Repetition time [s]
    Tr,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::G => "G",
            Column::BigDelta => "Delta",
            Column::SmallDelta => "delta",
            Column::B => "b",
            Column::MaxG => "maxG",
            Column::Te => "TE",
            Column::Tr => "TR",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gradient amplitude and timings for every volume of a protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTimings {
    pub gradient: Array1<f64>,
    pub big_delta: Array1<f64>,
    pub small_delta: Array1<f64>,
}

impl SequenceTimings {
    pub fn len(&self) -> usize {
        self.gradient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradient.is_empty()
    }

    /// b-values [s/m^2] implied by these timings.
    pub fn b_values(&self) -> Array1<f64> {
        Zip::from(&self.gradient)
            .and(&self.big_delta)
            .and(&self.small_delta)
            .map_collect(|&g, &big, &small| timings::b_value(g, big, small))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Protocol {
    config: ProtocolConfig,
    columns: BTreeMap<Column, Array1<f64>>,
    /// Unit gradient directions [n, 3]
    gradient_directions: Option<Array2<f64>>,
}

impl Protocol {
    pub fn new(config: ProtocolConfig) -> Self {
        Protocol {
            config,
            columns: BTreeMap::new(),
            gradient_directions: None,
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Number of volumes.
    pub fn len(&self) -> usize {
        self.columns
            .values()
            .next()
            .map(|c| c.len())
            .or_else(|| self.gradient_directions.as_ref().map(|g| g.nrows()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length every other column must have, ignoring `skip` since it is being replaced.
    fn expected_len(&self, skip: Column) -> Option<usize> {
        self.columns
            .iter()
            .find(|(name, _)| **name != skip)
            .map(|(_, c)| c.len())
            .or_else(|| self.gradient_directions.as_ref().map(|g| g.nrows()))
    }

    /// Add or replace a real column.
    pub fn add_column(&mut self, column: Column, values: Array1<f64>) -> MriResult<()> {
        if let Some(expected) = self.expected_len(column) {
            if values.len() != expected {
                return Err(MriError::ColumnLength {
                    column: column.name().to_string(),
                    expected,
                    found: values.len(),
                });
            }
        }
        self.columns.insert(column, values);
        Ok(())
    }

    pub fn with_column(mut self, column: Column, values: Array1<f64>) -> MriResult<Self> {
        self.add_column(column, values)?;
        Ok(self)
    }

    /// Set the gradient directions, one row `[gx, gy, gz]` per volume.
    pub fn with_gradient_directions(mut self, directions: Array2<f64>) -> MriResult<Self> {
        if directions.ncols() != 3 {
            return Err(MriError::InvalidShape(format!(
                "gradient directions need 3 columns, got {}",
                directions.ncols()
            )));
        }
        if let Some(expected) = self.columns.values().next().map(|c| c.len()) {
            if directions.nrows() != expected {
                return Err(MriError::ColumnLength {
                    column: "g".to_string(),
                    expected,
                    found: directions.nrows(),
                });
            }
        }
        self.gradient_directions = Some(directions);
        Ok(self)
    }

    pub fn gradient_directions(&self) -> Option<&Array2<f64>> {
        self.gradient_directions.as_ref()
    }

    /// Drop a real column. Removing an absent column is a no-op.
    pub fn remove_column(&mut self, column: Column) -> Option<Array1<f64>> {
        self.columns.remove(&column)
    }

    pub fn remove_gradient_directions(&mut self) -> Option<Array2<f64>> {
        self.gradient_directions.take()
    }

    fn check_indices(&self, indices: &[usize]) -> MriResult<()> {
        let n = self.len();
        match indices.iter().find(|&&i| i >= n) {
            Some(i) => Err(MriError::InvalidShape(format!(
                "row index {i} out of range for {n} volumes"
            ))),
            None => Ok(()),
        }
    }

    /// Remove the given rows from every column and from the directions.
    pub fn remove_rows(&mut self, rows: &[usize]) -> MriResult<()> {
        self.check_indices(rows)?;
        let keep: Vec<usize> = (0..self.len()).filter(|i| !rows.contains(i)).collect();
        *self = self.with_indices(&keep)?;
        Ok(())
    }

    /// New protocol holding only the given rows, in the given order.
    pub fn with_indices(&self, indices: &[usize]) -> MriResult<Protocol> {
        self.check_indices(indices)?;
        Ok(Protocol {
            config: self.config,
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (*name, values.select(Axis(0), indices)))
                .collect(),
            gradient_directions: self
                .gradient_directions
                .as_ref()
                .map(|dirs| dirs.select(Axis(0), indices)),
        })
    }

    /// Append the rows of `other` below this protocol's rows.
    ///
    /// Every column of this protocol must be available in `other`, real or
    /// derived; columns only `other` has are ignored. An empty protocol takes
    /// over all of `other`'s real columns.
    pub fn append(&mut self, other: &Protocol) -> MriResult<()> {
        if self.columns.is_empty() && self.gradient_directions.is_none() {
            self.columns = other.columns.clone();
            self.gradient_directions = other.gradient_directions.clone();
            return Ok(());
        }

        let mut columns = BTreeMap::new();
        for (name, values) in &self.columns {
            let tail = other.column(*name)?;
            let joined = concatenate(Axis(0), &[values.view(), tail.view()])
                .map_err(|e| MriError::InvalidShape(format!("cannot append {name}: {e}")))?;
            columns.insert(*name, joined);
        }
        let gradient_directions = match &self.gradient_directions {
            Some(dirs) => {
                let tail = other
                    .gradient_directions
                    .as_ref()
                    .ok_or_else(|| MriError::MissingColumn("g".to_string()))?;
                let joined = concatenate(Axis(0), &[dirs.view(), tail.view()])
                    .map_err(|e| MriError::InvalidShape(format!("cannot append g: {e}")))?;
                Some(joined)
            }
            None => None,
        };

        self.columns = columns;
        self.gradient_directions = gradient_directions;
        Ok(())
    }

    /// True if the column was supplied rather than derived.
    pub fn is_column_real(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// True if the column was supplied or can be derived.
    pub fn has_column(&self, column: Column) -> bool {
        self.column(column).is_ok()
    }

    fn real_column(&self, column: Column) -> MriResult<&Array1<f64>> {
        self.columns
            .get(&column)
            .ok_or_else(|| MriError::MissingColumn(column.name().to_string()))
    }

    /// A real column, or the derived one for `b`, `G`, `Delta` and `delta`.
    pub fn column(&self, column: Column) -> MriResult<Array1<f64>> {
        if let Some(values) = self.columns.get(&column) {
            return Ok(values.clone());
        }
        match column {
            Column::B => Ok(self.sequence_timings()?.b_values()),
            Column::G => Ok(self.sequence_timings()?.gradient),
            Column::BigDelta => Ok(self.sequence_timings()?.big_delta),
            Column::SmallDelta => Ok(self.sequence_timings()?.small_delta),
            Column::MaxG | Column::Te | Column::Tr => {
                Err(MriError::MissingColumn(column.name().to_string()))
            }
        }
    }

    pub fn b_values(&self) -> MriResult<Array1<f64>> {
        self.column(Column::B)
    }

    /// Volumes with a b-value below the threshold or a direction shorter than the
    /// norm limit. Without any b-values every volume counts as unweighted.
    /// Without gradient directions only the b-value threshold applies.
    pub fn unweighted_indices(&self) -> Vec<usize> {
        let n = self.len();
        let b = match self.column(Column::B) {
            Ok(b) => b,
            Err(_) => return (0..n).collect(),
        };
        let threshold = self.config.unweighted_threshold;
        let norm_limit = self.config.gradient_norm_limit;

        (0..n)
            .filter(|&i| {
                let short_direction = self.gradient_directions.as_ref().is_some_and(|dirs| {
                    let row = dirs.row(i);
                    row.dot(&row).sqrt() < norm_limit
                });
                b[i] < threshold || short_direction
            })
            .collect()
    }

    pub fn weighted_indices(&self) -> Vec<usize> {
        let unweighted = self.unweighted_mask();
        (0..self.len()).filter(|&i| !unweighted[i]).collect()
    }

    fn unweighted_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.len()];
        for i in self.unweighted_indices() {
            mask[i] = true;
        }
        mask
    }

    /// Volumes with `start <= b <= end`, regardless of weighting.
    pub fn indices_b_in_range(&self, start: f64, end: f64) -> MriResult<Vec<usize>> {
        let b = self.column(Column::B)?;
        Ok(b.iter()
            .enumerate()
            .filter(|&(_, &v)| start <= v && v <= end)
            .map(|(i, _)| i)
            .collect())
    }

    /// Number of volumes whose `column` value equals `value` exactly.
    pub fn count_value(&self, column: Column, value: f64) -> MriResult<usize> {
        Ok(self.column(column)?.iter().filter(|&&v| v == value).count())
    }

    pub fn shell_count(&self) -> usize {
        self.b_value_shells().len()
    }

    /// Sorted unique b-values of the weighted volumes.
    pub fn b_value_shells(&self) -> Vec<f64> {
        let b = match self.column(Column::B) {
            Ok(b) => b,
            Err(_) => return Vec::new(),
        };
        let mut shells: Vec<f64> = self.weighted_indices().into_iter().map(|i| b[i]).collect();
        shells.sort_by(f64::total_cmp);
        shells.dedup();
        shells
    }

    /// `G`, `Delta` and `delta` per volume, derived from whichever columns are real.
    ///
    /// Supplied timings take precedence; otherwise the missing one is solved from
    /// `b`. With `b` alone the timings are estimated from the largest shell and
    /// the scanner maximum gradient.
    pub fn sequence_timings(&self) -> MriResult<SequenceTimings> {
        let all_real = |columns: &[Column]| columns.iter().all(|c| self.is_column_real(*c));

        if all_real(&[Column::G, Column::SmallDelta, Column::BigDelta]) {
            log::debug!("sequence timings: using supplied G, Delta and delta");
            return Ok(SequenceTimings {
                gradient: self.real_column(Column::G)?.clone(),
                big_delta: self.real_column(Column::BigDelta)?.clone(),
                small_delta: self.real_column(Column::SmallDelta)?.clone(),
            });
        }

        if all_real(&[Column::B, Column::BigDelta, Column::SmallDelta]) {
            log::debug!("sequence timings: solving G from b, Delta and delta");
            let b = self.real_column(Column::B)?;
            let big = self.real_column(Column::BigDelta)?;
            let small = self.real_column(Column::SmallDelta)?;
            let unweighted = self.unweighted_mask();

            let mut gradient = Array1::zeros(b.len());
            for i in 0..b.len() {
                if !unweighted[i] {
                    gradient[i] = timings::gradient_amplitude(b[i], big[i], small[i])?;
                }
            }
            return Ok(SequenceTimings {
                gradient,
                big_delta: big.clone(),
                small_delta: small.clone(),
            });
        }

        if all_real(&[Column::B, Column::BigDelta, Column::G]) {
            log::debug!("sequence timings: solving delta from b, Delta and G");
            let b = self.real_column(Column::B)?;
            let big = self.real_column(Column::BigDelta)?;
            let g = self.real_column(Column::G)?;

            let unweighted = self.unweighted_mask();

            let mut small_delta = Array1::zeros(b.len());
            for i in 0..b.len() {
                if !unweighted[i] {
                    small_delta[i] = timings::small_delta(b[i], g[i], big[i])?;
                }
            }
            return Ok(SequenceTimings {
                gradient: g.clone(),
                big_delta: big.clone(),
                small_delta,
            });
        }

        if all_real(&[Column::B, Column::G, Column::SmallDelta]) {
            log::debug!("sequence timings: solving Delta from b, G and delta");
            let b = self.real_column(Column::B)?;
            let g = self.real_column(Column::G)?;
            let small = self.real_column(Column::SmallDelta)?;

            let big_delta = Zip::from(b)
                .and(g)
                .and(small)
                .map_collect(|&b, &g, &small| timings::big_delta(b, g, small));
            return Ok(SequenceTimings {
                gradient: g.clone(),
                big_delta,
                small_delta: small.clone(),
            });
        }

        let b = self.real_column(Column::B).map_err(|_| {
            MriError::MissingColumn("b (required to derive sequence timings)".to_string())
        })?;

        let max_g = match self.columns.get(&Column::MaxG) {
            Some(max_g) => max_g.clone(),
            None => Array1::from_elem(b.len(), self.config.max_gradient),
        };
        let b_max = self.b_value_shells().last().copied().unwrap_or(1.0);
        log::warn!("sequence timings: estimating from b-values only (b_max = {b_max:e} s/m^2)");

        let n = b.len();
        let mut estimated = SequenceTimings {
            gradient: Array1::zeros(n),
            big_delta: Array1::zeros(n),
            small_delta: Array1::zeros(n),
        };
        for i in 0..n {
            let (g, big, small) = timings::estimate_from_b(b[i], b_max, max_g[i])?;
            estimated.gradient[i] = g;
            estimated.big_delta[i] = big;
            estimated.small_delta[i] = small;
        }
        Ok(estimated)
    }
}
