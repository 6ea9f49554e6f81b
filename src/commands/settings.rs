// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, KEYS, Settings};
use crate::store::{Collection, Store};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let settings = Settings::load(store.conn())?;
            match sub.get_one::<String>("key") {
                Some(key) => println!("{}", settings.get(key)?),
                None => {
                    let mut rows = Vec::new();
                    for key in KEYS {
                        rows.push(vec![key.to_string(), settings.get(key)?]);
                    }
                    println!("{}", pretty_table(&["Key", "Value"], rows));
                }
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            store.write(&[Collection::Settings], |conn| config::set(conn, key, value))?;
            tracing::info!(key = %key, "setting updated");
            println!("{} = {}", key, Settings::load(store.conn())?.get(key)?);
        }
        _ => {}
    }
    Ok(())
}
