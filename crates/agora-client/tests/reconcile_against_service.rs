//! Drives the reconciler against a real `InteractionService` over an
//! in-memory store, with a transport that calls the service in-process.

#![allow(clippy::unwrap_used)]

use agora_client::{ClientError, ClientReconciler, InteractionTransport};
use agora_core::{InteractionService, MemoryPostStore, PostStore, RetryPolicy, ServiceError};
use agora_types::{InteractionOutcome, NamedAction, PostId, UserId};

struct InProcess {
    service: InteractionService<MemoryPostStore>,
    user: UserId,
}

fn to_client(err: ServiceError) -> ClientError {
    let status = match err {
        ServiceError::Unauthenticated => 401,
        ServiceError::InvalidInput(_) => 400,
        ServiceError::NotFound(_) => 404,
        ServiceError::Conflict { .. } => 409,
        ServiceError::Internal(_) => 500,
    };
    ClientError::Api {
        status,
        message: err.to_string(),
    }
}

impl InteractionTransport for InProcess {
    async fn perform(
        &self,
        post_id: PostId,
        action: NamedAction,
    ) -> Result<InteractionOutcome, ClientError> {
        self.service
            .perform(action, &post_id.to_string(), Some(self.user))
            .await
            .map_err(to_client)
    }

    async fn summary(&self, post_id: PostId) -> Result<InteractionOutcome, ClientError> {
        self.service
            .summary(&post_id.to_string(), Some(self.user))
            .await
            .map_err(to_client)
    }
}

async fn setup() -> (InProcess, PostId) {
    let store = MemoryPostStore::new();
    let post = PostId::new();
    store.create(post).await.unwrap();
    let transport = InProcess {
        service: InteractionService::new(store, RetryPolicy::default()),
        user: UserId::new(),
    };
    (transport, post)
}

#[tokio::test]
async fn dispatch_settles_on_server_state() {
    let (transport, post) = setup().await;
    let mut cards = ClientReconciler::new();
    cards.load(&transport, post).await.unwrap();

    let view = cards
        .dispatch(&transport, post, NamedAction::Upvote)
        .await
        .unwrap();
    assert_eq!(view.upvotes, 1);
    assert_eq!(view.version, 1);
    assert!(view.flags.upvote);

    let view = cards
        .dispatch(&transport, post, NamedAction::Downvote)
        .await
        .unwrap();
    assert_eq!((view.upvotes, view.downvotes), (0, 1));
    assert_eq!(view.version, 2);
}

#[tokio::test]
async fn server_error_reverts_the_card() {
    let (transport, post) = setup().await;
    let mut cards = ClientReconciler::new();
    cards.load(&transport, post).await.unwrap();

    // The post disappears server-side after the card was seeded.
    transport.service.store().delete(post).await.unwrap();

    let view = cards
        .dispatch(&transport, post, NamedAction::Follow)
        .await
        .unwrap();
    assert!(!view.flags.follow);
    let error = cards.card(post).and_then(|c| c.error()).unwrap();
    assert!(error.contains("404"));
}

#[tokio::test]
async fn loading_a_missing_post_fails() {
    let (transport, _) = setup().await;
    let mut cards = ClientReconciler::new();
    let missing = PostId::new();
    let err = cards.load(&transport, missing).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert!(cards.card(missing).is_none());
}
