#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

use anyhow::anyhow;
use farmstead::resources::AssetSource;

pub const EPSILON: f32 = 1e-4;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx3(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(a, b)| approx(*a, *b))
}

/// Serves files from memory and records every request in order.
#[derive(Clone, Default)]
pub struct MemorySource {
    files: Rc<HashMap<String, Vec<u8>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MemorySource {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Self {
        Self {
            files: Rc::new(
                files
                    .into_iter()
                    .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
                    .collect(),
            ),
            requests: Rc::default(),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn was_requested(&self, file_name: &str) -> bool {
        self.requests.borrow().iter().any(|r| r == file_name)
    }

    fn get(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        self.requests.borrow_mut().push(file_name.to_string());
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| anyhow!("{file_name} not found"))
    }
}

impl AssetSource for MemorySource {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        Ok(String::from_utf8(self.get(file_name)?)?)
    }

    async fn load_binary(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        self.get(file_name)
    }
}

pub const CRATE_MTL: &str = include_str!("../fixtures/crate.mtl");
pub const CRATE_OBJ: &str = include_str!("../fixtures/crate.obj");
