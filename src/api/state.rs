use std::{ops::Deref, sync::Arc};

use axum_template::engine::Engine;
use derive_new::new;
use tera::Tera;

use crate::page::Page;

pub type AppEngine = Engine<Tera>;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

#[derive(Clone, new)]
pub struct App {
    pub page: Arc<Page>,
    pub engine: AppEngine,
}

impl Deref for App {
    type Target = Page;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

pub fn templates() -> Result<AppEngine, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template("index.html", INDEX_TEMPLATE)?;

    Ok(Engine::from(tera))
}
