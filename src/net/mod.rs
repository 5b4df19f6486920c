// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Address arithmetic used by the prober and the heuristics.

pub mod cidr;

pub use cidr::{network_and_mask, offset, Cidr};
