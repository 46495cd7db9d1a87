// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form sub-components structured for MVU-style updates.

pub mod avatar;
pub mod techs;
