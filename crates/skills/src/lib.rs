//! Skill (plugin) system: manifest-described capabilities loaded from a
//! directory at startup.
//!
//! A loadable unit is a TOML manifest — either `<dir>/*.toml` or
//! `<dir>/<sub>/skill.toml` — declaring the skill's identity, trigger
//! examples, required entities, and a `kind` resolved through an
//! explicitly-registered factory table. There is no reflection over an
//! open type space: every kind maps to a typed constructor.

pub mod adapter;
pub mod factory;
pub mod kinds;
pub mod loader;
pub mod manifest;
pub mod skill;

pub use {
    adapter::{SKILL_PREFIX, SkillCapability},
    factory::SkillFactory,
    loader::SkillLoader,
    manifest::SkillManifest,
    skill::{Skill, SkillOutput},
};
