use std::time::Duration;
use log::info;
use serenity::builder::{CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::staff_only;
use crate::discord::ShardManagerContainer;

pub fn register() -> CreateCommand {
    staff_only(CreateCommand::new("ping").description("Check latency."))
}

/// Heartbeat latency of the shard serving this context. `None` until the
/// first heartbeat has been acknowledged.
async fn gateway_latency(ctx: &Context) -> Option<Duration> {
    let data = ctx.data.read().await;
    let manager = data.get::<ShardManagerContainer>()?;
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

fn latency_message(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("Pong! Client latency: {} ms", latency.as_millis()),
        None => "Pong! Client latency: not measured yet".to_string(),
    }
}

pub async fn run(ctx: &Context, command: &CommandInteraction) -> Result<(), serenity::Error> {
    let latency = gateway_latency(ctx).await;
    info!("Server staff member requested bot latency. Latency: {:?}.", latency);

    command.create_response(&ctx.http, CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(latency_message(latency))
            .ephemeral(true)
    )).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_is_reported_in_whole_milliseconds() {
        assert_eq!(latency_message(Some(Duration::from_micros(42_900))), "Pong! Client latency: 42 ms");
    }

    #[test]
    fn missing_heartbeat_is_reported() {
        assert_eq!(latency_message(None), "Pong! Client latency: not measured yet");
    }
}
