//! Ordered inbound update queue
//!
//! One unbounded mpsc channel per dispatcher. Senders can be cloned and
//! handed to whatever receives from the backend; the dispatcher drains the
//! stream in delivery order.

use super::types::Update;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Receiving side, consumed by `UpdateDispatcher::run`
pub struct UpdateStream {
    receiver: mpsc::UnboundedReceiver<Update>,
}

impl UpdateStream {
    pub fn new() -> (Self, UpdateSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { receiver }, UpdateSender { sender })
    }
}

impl Stream for UpdateStream {
    type Item = Update;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Sending side
#[derive(Clone)]
pub struct UpdateSender {
    sender: mpsc::UnboundedSender<Update>,
}

impl UpdateSender {
    pub fn send(&self, update: Update) -> Result<(), String> {
        self.sender
            .send(update)
            .map_err(|_| "Update stream closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::instances::InstanceId;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_updates_arrive_in_order() {
        let (mut stream, sender) = UpdateStream::new();
        for i in 0..5 {
            sender
                .send(Update::StartGivingToFriend(InstanceId::from(format!("i{}", i))))
                .unwrap();
        }

        for i in 0..5 {
            assert_eq!(
                stream.next().await,
                Some(Update::StartGivingToFriend(InstanceId::from(format!("i{}", i))))
            );
        }
    }

    #[tokio::test]
    async fn test_stream_closes_when_senders_dropped() {
        let (mut stream, sender) = UpdateStream::new();
        let second = sender.clone();
        drop(sender);
        second
            .send(Update::StopGivingToFriend(InstanceId::from("i")))
            .unwrap();
        drop(second);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (stream, sender) = UpdateStream::new();
        drop(stream);
        assert!(sender
            .send(Update::StopGivingToFriend(InstanceId::from("i")))
            .is_err());
    }
}
