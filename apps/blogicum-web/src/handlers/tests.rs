use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{DateTime, Duration, Utc};

use blogicum_core::domain::{Category, Comment, NewCategory, NewComment, NewPost, NewUser, Post, User};
use blogicum_core::{PageRequest, PostQuery};
use blogicum_infra::{InMemoryStore, JwtConfig};

use super::configure_routes;
use crate::middleware::auth::SESSION_COOKIE;
use crate::middleware::csrf::CsrfGuard;
use crate::state::AppState;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(CsrfGuard)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn state() -> AppState {
    AppState::in_memory(&InMemoryStore::new(), JwtConfig::default(), 10)
}

async fn user(state: &AppState, username: &str) -> User {
    state
        .users
        .create(NewUser::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-real-hash".to_string(),
        ))
        .await
        .unwrap()
}

async fn category(state: &AppState, slug: &str, published: bool) -> Category {
    state
        .categories
        .create(NewCategory {
            title: format!("Category {slug}"),
            description: String::new(),
            slug: slug.to_string(),
            is_published: published,
        })
        .await
        .unwrap()
}

async fn post(
    state: &AppState,
    author: &User,
    category: Option<&Category>,
    title: &str,
    published: bool,
    pub_date: DateTime<Utc>,
) -> Post {
    state
        .posts
        .create(NewPost {
            title: title.to_string(),
            text: format!("Body of {title}"),
            image: None,
            pub_date,
            is_published: published,
            author_id: author.id,
            category_id: category.map(|c| c.id),
            location_id: None,
        })
        .await
        .unwrap()
}

async fn public_post(state: &AppState, author: &User, category: &Category, title: &str) -> Post {
    post(
        state,
        author,
        Some(category),
        title,
        true,
        Utc::now() - Duration::hours(1),
    )
    .await
}

async fn comment(state: &AppState, post: &Post, author: &User, text: &str) -> Comment {
    state
        .comments
        .create(NewComment {
            text: text.to_string(),
            post_id: post.id,
            author_id: author.id,
        })
        .await
        .unwrap()
}

fn session(state: &AppState, user: &User) -> Cookie<'static> {
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    Cookie::new(SESSION_COOKIE, token)
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text<B: actix_web::body::MessageBody>(
    resp: actix_web::dev::ServiceResponse<B>,
) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_rt::test]
async fn feed_lists_only_public_posts() {
    let state = state();
    let anna = user(&state, "anna").await;
    let open = category(&state, "travel", true).await;
    let hidden = category(&state, "secret", false).await;
    let past = Utc::now() - Duration::days(1);

    public_post(&state, &anna, &open, "Visible trip").await;
    post(&state, &anna, Some(&open), "Draft trip", false, past).await;
    post(&state, &anna, Some(&open), "Future trip", true, Utc::now() + Duration::days(1)).await;
    post(&state, &anna, Some(&hidden), "Hidden trip", true, past).await;
    post(&state, &anna, None, "Loose trip", true, past).await;

    let app = app!(state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("Visible trip"));
    for title in ["Draft trip", "Future trip", "Hidden trip", "Loose trip"] {
        assert!(!body.contains(title), "{title} leaked into the feed");
    }
}

#[actix_rt::test]
async fn feed_second_page_holds_the_oldest_five() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    for i in 1..=15 {
        let pub_date = Utc::now() - Duration::hours(20 - i);
        post(&state, &anna, Some(&travel), &format!("Post #{i:02}"), true, pub_date).await;
    }

    let app = app!(state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=2").to_request()).await;
    let body = body_text(resp).await;

    for i in 1..=5 {
        assert!(body.contains(&format!("Post #{i:02}")));
    }
    assert!(!body.contains("Post #06"));
    let newest = body.find("Post #05").unwrap();
    let oldest = body.find("Post #01").unwrap();
    assert!(newest < oldest);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=abc").to_request())
        .await;
    let body = body_text(resp).await;
    assert!(body.contains("Post #15"));
    assert!(!body.contains("Post #05"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=99").to_request())
        .await;
    assert!(body_text(resp).await.contains("Post #01"));
}

#[actix_rt::test]
async fn owner_profile_shows_drafts_others_do_not() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    public_post(&state, &anna, &travel, "Out in the open").await;
    post(&state, &anna, Some(&travel), "Secret draft", false, Utc::now()).await;

    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/profile/anna/")
        .cookie(session(&state, &anna))
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Out in the open"));
    assert!(body.contains("Secret draft"));

    let req = test::TestRequest::get()
        .uri("/profile/anna/")
        .cookie(session(&state, &bob))
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Out in the open"));
    assert!(!body.contains("Secret draft"));

    let req = test::TestRequest::get().uri("/profile/nobody/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn hidden_post_detail_is_404_except_for_author() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    let draft = post(&state, &anna, Some(&travel), "Draft", false, Utc::now()).await;

    let app = app!(state);
    let uri = format!("/posts/{}/", draft.id);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(session(&state, &anna))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/999/").to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("404"));
}

#[actix_rt::test]
async fn category_page_requires_published_category() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    category(&state, "secret", false).await;
    public_post(&state, &anna, &travel, "Mountain hike").await;

    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/travel/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Mountain hike"));

    for uri in ["/category/secret/", "/category/missing/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_rt::test]
async fn created_post_belongs_to_session_user() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let category_id = travel.id.to_string();
    let anna_id = anna.id.to_string();

    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session(&state, &bob))
        .set_form([
            ("title", "Bob's trip"),
            ("text", "Went to the sea"),
            ("pub_date", "2024-01-01T10:00"),
            ("category", category_id.as_str()),
            ("is_published", "on"),
            ("author", anna_id.as_str()),
            ("author_id", anna_id.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/bob/");

    let now = Utc::now();
    let bobs = state
        .posts
        .list(&PostQuery::profile(bob.id, Some(bob.id), now), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(bobs.total, 1);
    assert_eq!(bobs.items[0].post.title, "Bob's trip");

    let annas = state
        .posts
        .list(&PostQuery::profile(anna.id, Some(anna.id), now), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(annas.total, 0);
}

#[actix_rt::test]
async fn long_post_text_is_accepted() {
    let state = state();
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let category_id = travel.id.to_string();
    let long_text = "a".repeat(20_000);

    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session(&state, &bob))
        .set_form([
            ("title", "A long read"),
            ("text", long_text.as_str()),
            ("pub_date", "2024-01-01T10:00"),
            ("category", category_id.as_str()),
            ("is_published", "on"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/bob/");

    let bobs = state
        .posts
        .list(
            &PostQuery::profile(bob.id, Some(bob.id), Utc::now()),
            PageRequest::first(10),
        )
        .await
        .unwrap();
    assert_eq!(bobs.total, 1);
    assert_eq!(bobs.items[0].post.text.len(), 20_000);
}

#[actix_rt::test]
async fn unreadable_form_body_gets_html_error_page() {
    let state = state();
    let bob = user(&state, "bob").await;

    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session(&state, &bob))
        .insert_header(header::ContentType::plaintext())
        .set_payload("title=Hi&text=Hello")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );

    let oversized = format!("title=Huge&text={}", "a".repeat(super::FORM_LIMIT));
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session(&state, &bob))
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(oversized)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("could not be processed"));

    let bobs = state
        .posts
        .list(
            &PostQuery::profile(bob.id, Some(bob.id), Utc::now()),
            PageRequest::first(10),
        )
        .await
        .unwrap();
    assert_eq!(bobs.total, 0);
}

#[actix_rt::test]
async fn post_redirects_follow_stored_username_not_session() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    let category_id = travel.id.to_string();
    // Issued before the rename below.
    let stale = session(&state, &anna);
    state
        .users
        .update(User {
            username: "anna_k".to_string(),
            ..anna.clone()
        })
        .await
        .unwrap();

    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(stale.clone())
        .set_form([
            ("title", "After the rename"),
            ("text", "Same person"),
            ("pub_date", "2024-01-01T10:00"),
            ("category", category_id.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/anna_k/");

    let doomed = public_post(&state, &anna, &travel, "Doomed").await;
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", doomed.id))
        .cookie(stale)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/anna_k/");
}

#[actix_rt::test]
async fn invalid_post_form_is_rerendered() {
    let state = state();
    let anna = user(&state, "anna").await;

    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session(&state, &anna))
        .set_form([("title", ""), ("text", "x"), ("pub_date", "yesterday")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("Enter a valid date/time."));

    let page = state
        .posts
        .list(&PostQuery::profile(anna.id, Some(anna.id), Utc::now()), PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[actix_rt::test]
async fn non_owner_cannot_edit_or_delete_post() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let original = public_post(&state, &anna, &travel, "Anna's trip").await;
    let category_id = travel.id.to_string();

    let app = app!(state);
    let detail = format!("/posts/{}/", original.id);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .cookie(session(&state, &bob))
        .set_form([
            ("title", "Hijacked"),
            ("text", "Mine now"),
            ("pub_date", "2024-01-01T10:00"),
            ("category", category_id.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", original.id))
        .cookie(session(&state, &bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let stored = state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
}

#[actix_rt::test]
async fn owner_edit_updates_post() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    let original = public_post(&state, &anna, &travel, "Old title").await;
    let category_id = travel.id.to_string();

    let app = app!(state);
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", original.id))
        .cookie(session(&state, &anna))
        .set_form([
            ("title", "New title"),
            ("text", "New text"),
            ("pub_date", "2024-03-01T08:30"),
            ("category", category_id.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/posts/{}/", original.id));

    let stored = state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "New title");
    assert!(!stored.is_published);
    assert_eq!(stored.author_id, anna.id);
}

#[actix_rt::test]
async fn author_delete_removes_post_and_comments() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let doomed = public_post(&state, &anna, &travel, "Doomed").await;
    let first = comment(&state, &doomed, &bob, "Nice").await;
    let second = comment(&state, &doomed, &anna, "Thanks").await;

    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/delete/", doomed.id))
        .cookie(session(&state, &anna))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", doomed.id))
        .cookie(session(&state, &anna))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/anna/");

    assert!(state.posts.find_by_id(doomed.id).await.unwrap().is_none());
    assert!(state.comments.find_by_id(first.id).await.unwrap().is_none());
    assert!(state.comments.find_by_id(second.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn anonymous_comment_edit_redirects_to_login() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    let target = public_post(&state, &anna, &travel, "Post").await;
    let original = comment(&state, &target, &anna, "Original").await;

    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/5/comment/3/edit/")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        "/auth/login/?next=%2Fposts%2F5%2Fcomment%2F3%2Fedit%2F"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/edit/", target.id, original.id))
        .set_form([("text", "Changed")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));

    let stored = state.comments.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Original");
}

#[actix_rt::test]
async fn non_owner_cannot_touch_comment() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let target = public_post(&state, &anna, &travel, "Post").await;
    let annas = comment(&state, &target, &anna, "Mine").await;

    let app = app!(state);
    let detail = format!("/posts/{}/", target.id);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/edit/", target.id, annas.id))
        .cookie(session(&state, &bob))
        .set_form([("text", "Bob was here")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/delete/", target.id, annas.id))
        .cookie(session(&state, &bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), detail);

    let stored = state.comments.find_by_id(annas.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Mine");
}

#[actix_rt::test]
async fn comment_of_another_post_is_404() {
    let state = state();
    let anna = user(&state, "anna").await;
    let travel = category(&state, "travel", true).await;
    let first = public_post(&state, &anna, &travel, "First").await;
    let second = public_post(&state, &anna, &travel, "Second").await;
    let on_first = comment(&state, &first, &anna, "On first").await;

    let app = app!(state);
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/comment/{}/edit/", second.id, on_first.id))
        .cookie(session(&state, &anna))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn comments_are_added_edited_and_deleted_by_author() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let target = public_post(&state, &anna, &travel, "Post").await;

    let app = app!(state);
    let detail = format!("/posts/{}/", target.id);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", target.id))
        .cookie(session(&state, &bob))
        .set_form([("text", "   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("This field is required."));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", target.id))
        .cookie(session(&state, &bob))
        .set_form([("text", "Great photos")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), detail);

    let comments = state.comments.list_for_post(target.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let added = comments[0].comment.clone();
    assert_eq!(added.author_id, bob.id);
    assert_eq!(added.text, "Great photos");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/edit/", target.id, added.id))
        .cookie(session(&state, &bob))
        .set_form([("text", "Great photos!")])
        .to_request();
    assert_eq!(location(&test::call_service(&app, req).await), detail);
    let stored = state.comments.find_by_id(added.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Great photos!");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/delete/", target.id, added.id))
        .cookie(session(&state, &bob))
        .to_request();
    assert_eq!(location(&test::call_service(&app, req).await), detail);
    assert!(state.comments.find_by_id(added.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn cannot_comment_on_hidden_post() {
    let state = state();
    let anna = user(&state, "anna").await;
    let bob = user(&state, "bob").await;
    let travel = category(&state, "travel", true).await;
    let draft = post(&state, &anna, Some(&travel), "Draft", false, Utc::now()).await;

    let app = app!(state);
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", draft.id))
        .cookie(session(&state, &bob))
        .set_form([("text", "Sneaky")])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(state.comments.list_for_post(draft.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn cross_site_post_is_forbidden() {
    let state = state();
    let anna = user(&state, "anna").await;

    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/logout/")
        .insert_header((header::HOST, "blog.test"))
        .insert_header((header::ORIGIN, "https://evil.example"))
        .cookie(session(&state, &anna))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(body_text(resp).await.contains("403"));

    let req = test::TestRequest::post()
        .uri("/auth/logout/")
        .insert_header((header::HOST, "blog.test"))
        .insert_header((header::ORIGIN, "http://blog.test"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_rt::test]
async fn register_login_and_logout() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_form([
            ("username", "newbie"),
            ("email", "newbie@example.com"),
            ("password1", "correct horse"),
            ("password2", "correct horse"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/newbie/");
    assert!(resp.response().cookies().any(|c| c.name() == SESSION_COOKIE));

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_form([
            ("username", "newbie"),
            ("email", "other@example.com"),
            ("password1", "another secret"),
            ("password2", "another secret"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("already exists"));

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "newbie"), ("password", "wrong password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("correct username and password"));

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=%2Fposts%2Fcreate%2F")
        .set_form([("username", "newbie"), ("password", "correct horse")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/posts/create/");

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=https%3A%2F%2Fevil.example%2F")
        .set_form([("username", "newbie"), ("password", "correct horse")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/profile/newbie/");

    let req = test::TestRequest::post().uri("/auth/logout/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/");
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(cleared.value(), "");
}

#[actix_rt::test]
async fn profile_edit_renames_and_reissues_session() {
    let state = state();
    let anna = user(&state, "anna").await;
    user(&state, "bob").await;

    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/profile/edit/")
        .cookie(session(&state, &anna))
        .set_form([
            ("username", "bob"),
            ("first_name", "Anna"),
            ("last_name", ""),
            ("email", "anna@example.com"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("already exists"));

    let req = test::TestRequest::post()
        .uri("/profile/edit/")
        .cookie(session(&state, &anna))
        .set_form([
            ("username", "anna_k"),
            ("first_name", "Anna"),
            ("last_name", "Karenina"),
            ("email", "anna@example.com"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/profile/anna_k/");

    let token = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .value()
        .to_string();
    let claims = state.tokens.validate_token(&token).unwrap();
    assert_eq!(claims.username, "anna_k");

    let stored = state.users.find_by_id(anna.id).await.unwrap().unwrap();
    assert_eq!(stored.display_name(), "Anna Karenina");
}

#[actix_rt::test]
async fn login_only_pages_redirect_anonymous_users() {
    let state = state();
    let app = app!(state);

    for uri in ["/posts/create/", "/profile/edit/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert!(location(&resp).starts_with("/auth/login/?next=%2F"));
    }
}

#[actix_rt::test]
async fn static_pages_health_and_unknown_routes() {
    let state = state();
    let app = app!(state);

    for uri in ["/about/", "/rules/", "/auth/login/", "/auth/registration/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/no/such/page/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Page not found"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/posts/not-a-number/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let health: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["backend"], "memory");
}
