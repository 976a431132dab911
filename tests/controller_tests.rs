use std::sync::Arc;

use ripple::controllers::follow::FollowPayload;
use ripple::controllers::login::LoginPayload;
use ripple::controllers::post::PostPayload;
use ripple::controllers::user::RegisterUser;
use ripple::controllers::{
    FollowController, LoginController, PostController, UserController, UserLookup, UserQuery,
};
use ripple::db::Store;
use ripple::outcome::Outcome;
use ripple::security::TokenIssuer;

async fn store() -> Store {
    // A single connection keeps the in-memory database alive and shared.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

fn users(store: &Store) -> Arc<UserController> {
    Arc::new(UserController::new(store.clone()))
}

fn register(email: &str, username: &str) -> RegisterUser {
    RegisterUser {
        email: Some(email.to_string()),
        username: Some(username.to_string()),
        password: Some("hunter22".to_string()),
        repeat_password: Some("hunter22".to_string()),
        name: Some("Toby".to_string()),
        last_name: Some("Flenderson".to_string()),
    }
}

async fn seed_user(controller: &UserController, email: &str, username: &str) {
    let ret = controller.create(Some(register(email, username))).await;
    assert!(ret.is_ok(), "seed user failed: {:?}", ret.message());
}

struct FailingLookup;

#[async_trait::async_trait]
impl UserLookup for FailingLookup {
    async fn get(&self, _query: &UserQuery) -> Outcome {
        Outcome::mock_error("any_message")
    }

    async fn get_password(&self, _query: &UserQuery) -> Outcome {
        Outcome::mock_error("any_message")
    }
}

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn create_without_request_is_an_exception() {
        let store = store().await;
        let ret = users(&store).create(None).await;

        assert_eq!(ret.code(), 500);
        assert_eq!(ret.identifier(), Some("RequiredFieldException"));
        assert_eq!(ret.message(), Some("Request is required."));
    }

    #[tokio::test]
    async fn create_reports_the_first_missing_field() {
        let store = store().await;
        let controller = users(&store);

        let ret = controller.create(Some(RegisterUser::default())).await;
        assert_eq!(ret.message(), Some("E-mail is required."));
        assert_eq!(ret.code(), 400);

        let mut request = register("toby@dundermifflin.com", "toby");
        request.username = None;
        let ret = controller.create(Some(request)).await;
        assert_eq!(ret.message(), Some("Username is required."));

        let mut request = register("toby@dundermifflin.com", "toby");
        request.repeat_password = Some(String::new());
        let ret = controller.create(Some(request)).await;
        assert_eq!(ret.message(), Some("Repeat Password is required."));

        let mut request = register("toby@dundermifflin.com", "toby");
        request.last_name = None;
        let ret = controller.create(Some(request)).await;
        assert_eq!(ret.message(), Some("Last Name is required."));
    }

    #[tokio::test]
    async fn password_length_is_bounded() {
        let store = store().await;
        let controller = users(&store);

        for bad in ["abc", &"x".repeat(51)] {
            let mut request = register("toby@dundermifflin.com", "toby");
            request.password = Some(bad.to_string());
            request.repeat_password = Some(bad.to_string());

            let ret = controller.create(Some(request)).await;
            assert_eq!(ret.identifier(), Some("InvalidField"));
            assert_eq!(ret.code(), 402);
            assert_eq!(
                ret.message(),
                Some("Password must have more than 5 characters and less than 50")
            );
        }

        let mut request = register("toby@dundermifflin.com", "toby");
        request.password = Some("12345".to_string());
        request.repeat_password = Some("12345".to_string());
        assert!(controller.create(Some(request)).await.is_ok());
    }

    #[tokio::test]
    async fn email_length_is_bounded() {
        let store = store().await;
        let controller = users(&store);

        let mut request = register("a@b", "toby");
        request.email = Some("a@b".to_string());
        let ret = controller.create(Some(request)).await;
        assert_eq!(
            ret.message(),
            Some("E-mail must have more than 5 characters and less than 77")
        );
    }

    #[tokio::test]
    async fn repeat_password_must_match() {
        let store = store().await;
        let mut request = register("toby@dundermifflin.com", "toby");
        request.repeat_password = Some("different".to_string());

        let ret = users(&store).create(Some(request)).await;
        assert_eq!(
            ret.message(),
            Some("Repeat Password must be equal to the Password.")
        );
        assert_eq!(ret.code(), 402);
    }

    #[tokio::test]
    async fn duplicated_email_is_rejected() {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let ret = controller
            .create(Some(register("toby@dundermifflin.com", "toby2")))
            .await;
        assert_eq!(ret.identifier(), Some("DuplicatedEntry"));
        assert_eq!(ret.code(), 401);
        assert_eq!(ret.message(), Some("User already exists."));
    }

    #[tokio::test]
    async fn duplicated_username_surfaces_from_the_store() {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        // A different email passes the pre-insert lookup; the key collision
        // only shows up at write time.
        let ret = controller
            .create(Some(register("toby.f@dundermifflin.com", "toby")))
            .await;
        assert_eq!(ret.identifier(), Some("DuplicatedEntry"));
        assert_eq!(ret.code(), 401);
        assert_eq!(ret.message(), Some("User already exists."));
    }

    #[tokio::test]
    async fn created_user_never_exposes_the_password() {
        let store = store().await;
        let controller = users(&store);

        let ret = controller
            .create(Some(register("toby@dundermifflin.com", "toby")))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.message(), Some("User created successfully."));
        let data = ret.data().expect("created user data");
        assert_eq!(data["username"], "toby");
        assert!(data.get("password").is_none());

        let ret = controller
            .get(Some(UserQuery::by_email("toby@dundermifflin.com")))
            .await;
        assert_eq!(ret.code(), 201);
        assert!(ret.data().expect("user data").get("password").is_none());
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let ret = controller
            .get_password(Some(UserQuery::by_email("toby@dundermifflin.com")))
            .await;
        assert!(ret.is_ok());
        let data = ret.data().expect("password projection");
        let hash = data["password"].as_str().expect("hash string");
        assert_ne!(hash, "hunter22");
        assert!(hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn get_requires_some_identifier() {
        let store = store().await;
        let ret = users(&store).get(Some(UserQuery::default())).await;
        assert_eq!(ret.message(), Some("E-mail/username is required."));
        assert_eq!(ret.code(), 400);
    }

    #[tokio::test]
    async fn get_unknown_user_is_inexistent() {
        let store = store().await;
        let ret = users(&store)
            .get(Some(UserQuery::by_username("nobody")))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
        assert_eq!(ret.code(), 404);
        assert_eq!(ret.message(), Some("User does not exist."));
    }

    #[tokio::test]
    async fn remove_deletes_an_existing_user() {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let ret = controller
            .remove(Some(UserQuery::by_email("toby@dundermifflin.com")))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.code(), 200);

        let ret = controller
            .get(Some(UserQuery::by_email("toby@dundermifflin.com")))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
    }

    #[tokio::test]
    async fn remove_unknown_user_propagates_not_found() {
        let store = store().await;
        let ret = users(&store)
            .remove(Some(UserQuery::by_email("nobody@nowhere.com")))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
    }
}

mod post_tests {
    use super::*;

    async fn setup() -> (Store, Arc<UserController>, PostController) {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let lookup: Arc<dyn UserLookup> = controller.clone();
        let posts = PostController::new(store.clone(), lookup);
        (store, controller, posts)
    }

    fn new_post(username: &str, title: &str, content: &str) -> PostPayload {
        PostPayload {
            username: Some(username.to_string()),
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            ..PostPayload::default()
        }
    }

    #[tokio::test]
    async fn create_derives_the_id_from_the_title() {
        let (_store, _users, posts) = setup().await;

        let ret = posts
            .create(Some(new_post("toby", "Hello World", "first")))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.data().expect("post data")["post_id"], "hello-world");

        let ret = posts
            .create(Some(new_post("toby", "Hello World", "second")))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.data().expect("post data")["post_id"], "hello-world-1");
    }

    #[tokio::test]
    async fn create_validates_fields_in_order() {
        let (_store, _users, posts) = setup().await;

        let ret = posts.create(None).await;
        assert_eq!(ret.identifier(), Some("RequiredFieldException"));
        assert_eq!(ret.message(), Some("Post is required."));

        let ret = posts.create(Some(PostPayload::default())).await;
        assert_eq!(ret.message(), Some("Content is required."));

        let ret = posts
            .create(Some(PostPayload {
                content: Some("hi".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert_eq!(ret.message(), Some("Title is required."));
    }

    #[tokio::test]
    async fn create_rejects_long_content() {
        let (_store, _users, posts) = setup().await;

        let ret = posts
            .create(Some(new_post("toby", "Long", &"x".repeat(301))))
            .await;
        assert_eq!(ret.identifier(), Some("InvalidField"));
        assert_eq!(
            ret.message(),
            Some("Post content must have less than 300 characters")
        );
    }

    #[tokio::test]
    async fn create_for_unknown_user_adds_context() {
        let (_store, _users, posts) = setup().await;

        let ret = posts
            .create(Some(new_post("nobody", "Hello", "hi")))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
        assert_eq!(
            ret.message(),
            Some("Error at getting user: User does not exist.")
        );
    }

    #[tokio::test]
    async fn get_joins_the_owner_projection() {
        let (_store, _users, posts) = setup().await;
        posts
            .create(Some(new_post("toby", "Hello World", "first")))
            .await;

        let ret = posts
            .get(Some(PostPayload {
                post_id: Some("hello-world".to_string()),
                username: Some("toby".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert_eq!(ret.code(), 201);
        let data = ret.data().expect("post data");
        assert_eq!(data["user"]["name"], "Toby");
        assert_eq!(data["user"]["last_name"], "Flenderson");
    }

    #[tokio::test]
    async fn get_distinguishes_wrong_owner_from_missing_post() {
        let (_store, controller, posts) = setup().await;
        seed_user(&controller, "daphne@dundermifflin.com", "daphne").await;
        posts
            .create(Some(new_post("toby", "Hello World", "first")))
            .await;

        let ret = posts
            .get(Some(PostPayload {
                post_id: Some("hello-world".to_string()),
                username: Some("daphne".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert_eq!(ret.identifier(), Some("WrongInfo"));
        assert_eq!(ret.code(), 402);
        assert_eq!(ret.message(), Some("Username is wrong."));

        let ret = posts
            .get(Some(PostPayload {
                post_id: Some("no-such-post".to_string()),
                username: Some("toby".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
        assert_eq!(ret.message(), Some("Post does not exist."));
    }

    #[tokio::test]
    async fn update_patches_only_the_content() {
        let (_store, _users, posts) = setup().await;
        posts
            .create(Some(new_post("toby", "Hello World", "first")))
            .await;

        let ret = posts
            .update(Some(PostPayload {
                post_id: Some("hello-world".to_string()),
                username: Some("toby".to_string()),
                content: Some("edited".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.data().expect("post data")["content"], "edited");
        assert_eq!(ret.data().expect("post data")["title"], "Hello World");
    }

    #[tokio::test]
    async fn update_requires_the_content_field() {
        let (_store, _users, posts) = setup().await;

        let ret = posts
            .update(Some(PostPayload {
                post_id: Some("hello-world".to_string()),
                username: Some("toby".to_string()),
                ..PostPayload::default()
            }))
            .await;
        assert_eq!(ret.message(), Some("Post content is required."));
    }

    #[tokio::test]
    async fn delete_removes_the_post() {
        let (_store, _users, posts) = setup().await;
        posts
            .create(Some(new_post("toby", "Hello World", "first")))
            .await;

        let payload = PostPayload {
            post_id: Some("hello-world".to_string()),
            username: Some("toby".to_string()),
            ..PostPayload::default()
        };

        let ret = posts.delete(Some(payload.clone())).await;
        assert!(ret.is_ok());

        let ret = posts.get(Some(payload)).await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
    }

    #[tokio::test]
    async fn lookup_failures_pass_through_with_context() {
        let store = store().await;
        let posts = PostController::new(store.clone(), Arc::new(FailingLookup));

        let ret = posts
            .create(Some(new_post("toby", "Hello", "hi")))
            .await;
        assert_eq!(ret.identifier(), Some("MockError"));
        assert_eq!(ret.message(), Some("Error at getting user: any_message"));
    }
}

mod follow_tests {
    use super::*;

    async fn setup() -> (Store, Arc<UserController>, FollowController) {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let mut daphne = register("daphne@dundermifflin.com", "daphne");
        daphne.name = Some("Daphne".to_string());
        let ret = controller.create(Some(daphne)).await;
        assert!(ret.is_ok(), "seed user failed: {:?}", ret.message());

        let lookup: Arc<dyn UserLookup> = controller.clone();
        let follows = FollowController::new(store.clone(), lookup);
        (store, controller, follows)
    }

    fn pair(sender: &str, receiver: &str) -> FollowPayload {
        FollowPayload {
            sender_username: Some(sender.to_string()),
            receiver_username: Some(receiver.to_string()),
            ..FollowPayload::default()
        }
    }

    #[tokio::test]
    async fn follow_creates_a_non_pending_request() {
        let (_store, _users, follows) = setup().await;

        let ret = follows
            .follow(Some(FollowPayload {
                title: Some("Hey Toby, can I follow you?".to_string()),
                ..pair("daphne", "toby")
            }))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.code(), 200);
        let data = ret.data().expect("follow data");
        assert_eq!(data["is_pending"], false);
        assert_eq!(data["title"], "Hey Toby, can I follow you?");
    }

    #[tokio::test]
    async fn following_twice_returns_the_existing_row() {
        let (_store, _users, follows) = setup().await;

        let first = follows.follow(Some(pair("daphne", "toby"))).await;
        assert!(first.is_ok());

        let second = follows.follow(Some(pair("daphne", "toby"))).await;
        assert!(second.is_ok());
        assert_eq!(second.code(), 201);
        assert_eq!(
            second.data().expect("follow data")["sender_username"],
            "daphne"
        );
    }

    #[tokio::test]
    async fn unknown_users_are_reported_by_side() {
        let (_store, _users, follows) = setup().await;

        let ret = follows.follow(Some(pair("nobody", "toby"))).await;
        assert_eq!(ret.message(), Some("User does not exist."));

        let ret = follows.follow(Some(pair("daphne", "nobody"))).await;
        assert_eq!(ret.message(), Some("Receiver User does not exist."));
    }

    #[tokio::test]
    async fn non_lookup_failures_propagate_unchanged() {
        let store = store().await;
        let follows = FollowController::new(store.clone(), Arc::new(FailingLookup));

        let ret = follows.follow(Some(pair("daphne", "toby"))).await;
        assert_eq!(ret.identifier(), Some("MockError"));
        assert_eq!(ret.message(), Some("any_message"));
    }

    #[tokio::test]
    async fn get_requires_both_usernames() {
        let (_store, _users, follows) = setup().await;

        let ret = follows.get(None).await;
        assert_eq!(ret.identifier(), Some("RequiredFieldException"));
        assert_eq!(ret.message(), Some("Follow is required."));

        let ret = follows.get(Some(FollowPayload::default())).await;
        assert_eq!(ret.message(), Some("Sender username is required."));

        let ret = follows
            .get(Some(FollowPayload {
                sender_username: Some("daphne".to_string()),
                ..FollowPayload::default()
            }))
            .await;
        assert_eq!(ret.message(), Some("Receiver username is required."));
    }

    #[tokio::test]
    async fn get_joins_both_display_names() {
        let (_store, _users, follows) = setup().await;
        follows.follow(Some(pair("daphne", "toby"))).await;

        let ret = follows.get(Some(pair("daphne", "toby"))).await;
        assert_eq!(ret.code(), 201);
        let data = ret.data().expect("follow data");
        assert_eq!(data["sender_name"], "Daphne");
        assert_eq!(data["receiver_name"], "Toby");
    }

    #[tokio::test]
    async fn set_pending_flips_the_flag() {
        let (_store, _users, follows) = setup().await;
        follows.follow(Some(pair("daphne", "toby"))).await;

        let ret = follows
            .set_pending(Some(FollowPayload {
                is_pending: Some(true),
                ..pair("daphne", "toby")
            }))
            .await;
        assert!(ret.is_ok());
        assert_eq!(ret.data().expect("follow data")["is_pending"], true);
    }

    #[tokio::test]
    async fn set_pending_requires_the_flag() {
        let (_store, _users, follows) = setup().await;
        follows.follow(Some(pair("daphne", "toby"))).await;

        let ret = follows.set_pending(Some(pair("daphne", "toby"))).await;
        assert_eq!(ret.message(), Some("Is pending is required."));
    }

    #[tokio::test]
    async fn unfollow_removes_the_pair() {
        let (_store, _users, follows) = setup().await;
        follows.follow(Some(pair("daphne", "toby"))).await;

        let ret = follows.unfollow(Some(pair("daphne", "toby"))).await;
        assert!(ret.is_ok());

        let ret = follows.get(Some(pair("daphne", "toby"))).await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
        assert_eq!(ret.message(), Some("Follow does not exist."));
    }
}

mod login_tests {
    use super::*;

    async fn setup() -> (Store, LoginController) {
        let store = store().await;
        let controller = users(&store);
        seed_user(&controller, "toby@dundermifflin.com", "toby").await;

        let lookup: Arc<dyn UserLookup> = controller;
        let tokens = TokenIssuer::new("test-secret".to_string(), 3600);
        (store, LoginController::new(lookup, tokens))
    }

    fn credentials(email: &str, password: &str) -> LoginPayload {
        LoginPayload {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn login_returns_a_token_without_the_hash() {
        let (_store, login) = setup().await;

        let ret = login
            .login(Some(credentials("toby@dundermifflin.com", "hunter22")))
            .await;
        assert!(ret.is_ok(), "login failed: {:?}", ret.message());
        assert_eq!(ret.code(), 200);

        let data = ret.data().expect("login data");
        assert_eq!(data["username"], "toby");
        assert!(!data["token"].as_str().expect("token").is_empty());
        assert!(data.get("password").is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (_store, login) = setup().await;

        let ret = login
            .login(Some(credentials("toby@dundermifflin.com", "wrong-pass")))
            .await;
        assert_eq!(ret.identifier(), Some("IncorrectPassword"));
        assert_eq!(ret.code(), 402);
        assert_eq!(ret.message(), Some("Incorrect password."));
    }

    #[tokio::test]
    async fn unknown_email_propagates_not_found() {
        let (_store, login) = setup().await;

        let ret = login
            .login(Some(credentials("nobody@nowhere.com", "hunter22")))
            .await;
        assert_eq!(ret.identifier(), Some("InexistentEntry"));
        assert_eq!(ret.code(), 404);
    }

    #[tokio::test]
    async fn fields_are_checked_in_order() {
        let (_store, login) = setup().await;

        let ret = login.login(None).await;
        assert_eq!(ret.identifier(), Some("RequiredFieldException"));
        assert_eq!(ret.message(), Some("Request is required."));

        let ret = login.login(Some(LoginPayload::default())).await;
        assert_eq!(ret.message(), Some("E-mail is required."));

        let ret = login
            .login(Some(LoginPayload {
                email: Some("toby@dundermifflin.com".to_string()),
                password: None,
            }))
            .await;
        assert_eq!(ret.message(), Some("Password is required."));
    }
}
