// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod doctor;
pub mod exporter;
pub mod loans;
pub mod months;
pub mod recurring;
pub mod savings;
pub mod settings;
pub mod summary;
pub mod tax;
pub mod transactions;
