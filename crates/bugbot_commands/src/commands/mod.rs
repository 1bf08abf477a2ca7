use bugbot_util::prelude::*;
use poise::Command;

pub mod bugpanel;

pub fn all_commands() -> Vec<Command<UserData, Error>> {
    vec![bugpanel::setup_bugpanel()]
}
