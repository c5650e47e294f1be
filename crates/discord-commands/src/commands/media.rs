//! Commands backed by the public joke, meme and animal picture APIs.
//!
//! A failed or malformed fetch is reported to the user as a rejection,
//! never as an internal error.

use async_trait::async_trait;

use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::registry::Command;

fn unavailable(thing: &str, cause: reqwest::Error) -> CommandError {
    CommandError::rejected_by(format!("Couldn't fetch a {} right now.", thing), cause)
}

pub struct Joke;

#[async_trait]
impl Command for Joke {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let joke = ctx
            .state
            .web
            .joke()
            .await
            .map_err(|e| unavailable("joke", e))?;
        ctx.reply(format!("😂 {} — {}", joke.setup, joke.punchline))
            .await?;
        Ok(())
    }
}

pub struct Meme;

#[async_trait]
impl Command for Meme {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let meme = ctx
            .state
            .web
            .meme()
            .await
            .map_err(|e| unavailable("meme", e))?;
        ctx.reply(meme.url).await?;
        Ok(())
    }
}

pub struct Cat;

#[async_trait]
impl Command for Cat {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let cat = ctx
            .state
            .web
            .cat()
            .await
            .map_err(|e| unavailable("cat picture", e))?;
        ctx.reply(cat.file).await?;
        Ok(())
    }
}

pub struct Dog;

#[async_trait]
impl Command for Dog {
    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> CommandResult {
        let dog = ctx
            .state
            .web
            .dog()
            .await
            .map_err(|e| unavailable("dog picture", e))?;
        ctx.reply(dog.url).await?;
        Ok(())
    }
}
