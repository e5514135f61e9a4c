// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Boots a kernel with one mapped entity and round-trips it through the
//! in-memory backend.
//!
//! `RUST_LOG=debug cargo run -p bundlebase-sdk --bin bundlebase-demo`

use anyhow::Context;
use bundlebase_sdk::prelude::*;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
struct Book {
    id: u32,
    title: String,
}

impl Entity for Book {
    fn class_name(&self) -> &str {
        "Demo::Entity::Book"
    }

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "title" => Some(json!(self.title)),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let provider = StandardMappingBagProvider::new(
        [("book", "Book")],
        "DemoBundle",
        "Demo::Entity",
        "demo",
    )
    .with_options(MappingOptions::default().overwritable(true));

    let kernel = Kernel::new(
        vec![MappingBundle::new("DemoMappingBundle", provider).into()],
        KernelConfig::default(),
    )
    .boot()?;

    let director = kernel
        .accessor()
        .get::<ObjectDirector>("demo.object_director.book")
        .context("the book director should be defined")?;

    director.save(Arc::new(Book {
        id: 1,
        title: "The Rust Programming Language".to_owned(),
    }))?;

    let book = kernel
        .accessor()
        .find("demo:book", 1)?
        .context("the saved book should be found")?;
    let title = book
        .downcast_ref::<Book>()
        .map(|book| book.title.as_str())
        .unwrap_or_default();
    log::info!("Found book #{}: {}", book.id(), title);
    log::info!("Bundles: {:?}", kernel.bundle_names());

    Ok(())
}
