pub use crate::UserData;

pub type Error = anyhow::Error;

pub type Res<T> = anyhow::Result<T>;

pub type Ctx<'a> = poise::Context<'a, UserData, Error>;
