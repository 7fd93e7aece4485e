// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Minimum-duration filter for cheap runs

/// Clear every run of `true` shorter than `min_run` slots
///
/// Single left-to-right pass; a virtual trailing `false` flushes the last run.
/// Runs of at least `min_run` slots are left untouched.
pub fn filter_short_runs(mask: &[bool], min_run: usize) -> Vec<bool> {
    let mut result = mask.to_vec();
    let mut run_start = None;
    let mut cleared = 0_usize;

    for (i, cheap) in mask.iter().copied().chain(std::iter::once(false)).enumerate() {
        match (cheap, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if i - start < min_run {
                    result[start..i].fill(false);
                    cleared += 1;
                }
                run_start = None;
            }
            _ => {}
        }
    }

    if cleared > 0 {
        tracing::debug!("Cleared {cleared} cheap runs shorter than {min_run} slots");
    }

    result
}
