// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::period::{Period, days_in_month, days_remaining_in_month, sum_all, sum_in_period};
use crate::models::{SavingsEntry, SavingsSettings};

/// 1 000 000, used when no settings row exists yet.
pub const DEFAULT_GOAL: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProjection {
    pub goal: Decimal,
    pub target_monthly: Decimal,
    pub total_saved: Decimal,
    pub saved_this_month: Decimal,
    pub remaining_to_goal: Decimal,
    pub progress_pct: Decimal,
    /// `progress_pct` clamped to 0..=100 for display.
    pub display_pct: Decimal,
    pub estimated_months_to_goal: Option<u64>,
    pub remaining_this_month: Decimal,
    pub days_remaining: u32,
    pub recommended_daily: Decimal,
    pub average_daily_target: Decimal,
}

impl SavingsProjection {
    pub fn compute(
        settings: Option<&SavingsSettings>,
        entries: &[SavingsEntry],
        today: NaiveDate,
    ) -> SavingsProjection {
        let goal = settings.map(|s| s.goal_amount).unwrap_or(DEFAULT_GOAL);
        let target_monthly = settings
            .map(|s| s.target_monthly)
            .unwrap_or(Decimal::ZERO);

        let total_saved = sum_all(entries);
        let saved_this_month = sum_in_period(entries, &Period::month_of(today));

        let remaining_to_goal = (goal - total_saved).max(Decimal::ZERO);
        let progress_pct = if goal > Decimal::ZERO {
            total_saved / goal * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let estimated_months_to_goal = if target_monthly > Decimal::ZERO {
            (remaining_to_goal / target_monthly).ceil().to_u64()
        } else {
            None
        };
        let remaining_this_month = (target_monthly - saved_this_month).max(Decimal::ZERO);
        let days_remaining = days_remaining_in_month(today);

        SavingsProjection {
            goal,
            target_monthly,
            total_saved,
            saved_this_month,
            remaining_to_goal,
            progress_pct,
            display_pct: progress_pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            estimated_months_to_goal,
            remaining_this_month,
            days_remaining,
            recommended_daily: remaining_this_month / Decimal::from(days_remaining),
            average_daily_target: target_monthly / Decimal::from(days_in_month(today)),
        }
    }
}
