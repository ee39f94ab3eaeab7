//! End-to-end review lifecycle through the real services and store:
//! comment, reply, vote toggle, moderation delete, pagination.

mod common;

use domains::{CommentStore, DomainError, ReplyAnchor, Role, VoteKind, VoteStore, VoteTarget};
use services::COMMENTS_PER_PAGE;

#[tokio::test]
async fn review_lifecycle_from_comment_to_moderated_delete() {
    let app = common::app().await;
    let admin = common::user(&app, "admin@example.com", Role::Admin).await;
    let u1 = common::user(&app, "u1@example.com", Role::User).await;
    let u2 = common::user(&app, "u2@example.com", Role::User).await;
    let movie = common::movie(&app, &admin, "Heat").await;

    let c = app
        .comments
        .post_comment(&u1, movie.id, "Tense and lean", Some(7.0), None)
        .await
        .unwrap();
    assert_eq!(c.user_rating, Some(7.0));

    let r = app
        .comments
        .post_reply(&u2, ReplyAnchor::Comment(c.id), "Agreed, the diner scene alone")
        .await
        .unwrap();
    assert_eq!(r.comment_id, c.id);

    // First like lands.
    let tally = app.votes.cast(&u1, VoteTarget::Comment(c.id), VoteKind::Like).await.unwrap();
    assert_eq!((tally.likes, tally.dislikes), (1, 0));

    // Same like again toggles it off and removes the ledger row.
    let tally = app.votes.cast(&u1, VoteTarget::Comment(c.id), VoteKind::Like).await.unwrap();
    assert_eq!((tally.likes, tally.dislikes), (0, 0));
    assert!(app.store.find(u1.id, VoteTarget::Comment(c.id)).await.unwrap().is_none());

    // Leave one vote on the reply, then moderate the whole thread away.
    app.votes.cast(&u2, VoteTarget::Reply(r.id), VoteKind::Dislike).await.unwrap();
    app.comments.delete_comment(&admin, c.id).await.unwrap();

    assert!(app.store.get_comment(c.id).await.unwrap().is_none());
    assert!(app.store.get_reply(r.id).await.unwrap().is_none());
    assert_eq!(app.store.count_for_target(VoteTarget::Reply(r.id)).await.unwrap(), 0);

    let (page, total) = app.comments.list_page(movie.id, 0).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn listing_pages_newest_first_with_replies_attached() {
    let app = common::app().await;
    let admin = common::user(&app, "admin@example.com", Role::Admin).await;
    let author = common::user(&app, "author@example.com", Role::User).await;
    let movie = common::movie(&app, &admin, "Ran").await;

    let mut ids = Vec::new();
    for n in 0..7 {
        let c = app
            .comments
            .post_comment(&author, movie.id, &format!("take {n}"), Some(6.0), None)
            .await
            .unwrap();
        ids.push(c.id);
    }
    let newest = *ids.last().unwrap();
    app.comments
        .post_reply(&author, ReplyAnchor::Comment(newest), "following up")
        .await
        .unwrap();

    let (page, total) = app.comments.list_page(movie.id, 0).await.unwrap();
    assert_eq!(total, 7);
    assert_eq!(page.len(), COMMENTS_PER_PAGE as usize);
    assert_eq!(page[0].comment.id, newest);
    assert_eq!(page[0].replies.len(), 1);
    assert_eq!(page[0].author.email, "author@example.com");

    let (rest, _) = app.comments.list_page(movie.id, COMMENTS_PER_PAGE).await.unwrap();
    assert_eq!(rest.len(), 2);

    // Past the end is an empty page, not an error.
    let (empty, total) = app.comments.list_page(movie.id, 1_000).await.unwrap();
    assert!(empty.is_empty());
    assert_eq!(total, 7);

    let err = app.comments.list_page(movie.id + 999, 0).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_movie_takes_its_thread_with_it() {
    let app = common::app().await;
    let admin = common::user(&app, "admin@example.com", Role::Admin).await;
    let author = common::user(&app, "author@example.com", Role::User).await;
    let movie = common::movie(&app, &admin, "Stalker").await;

    let c = app
        .comments
        .post_comment(&author, movie.id, "slow but worth it", Some(9.0), None)
        .await
        .unwrap();
    let r = app
        .comments
        .post_reply(&author, ReplyAnchor::Comment(c.id), "rewatching tonight")
        .await
        .unwrap();
    app.votes.cast(&admin, VoteTarget::Comment(c.id), VoteKind::Like).await.unwrap();

    app.movies.delete(&admin, movie.id).await.unwrap();

    assert!(app.store.get_comment(c.id).await.unwrap().is_none());
    assert!(app.store.get_reply(r.id).await.unwrap().is_none());
    assert_eq!(app.store.count_for_target(VoteTarget::Comment(c.id)).await.unwrap(), 0);
    let err = app.movies.get(movie.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}
