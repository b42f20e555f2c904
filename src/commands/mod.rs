// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod currencies;
pub mod doctor;
pub mod expenses;
pub mod income;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod transfers;
