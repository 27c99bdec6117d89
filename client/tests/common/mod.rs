//! # Test Harness
//!
//! In-process mock of the marketplace backend (REST + socket) served by axum
//! on an ephemeral port, and a fully wired [`Store`] pointed at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_channel::Receiver;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{
    AuthResponse, Listing, ListingEnvelope, ListingsResponse, LoginRequest, Message, PageMeta, Payment,
    PaymentResponse, PaymentStatus, PaymentsResponse, ProfileResponse, Role, SendMessageRequest,
    SocketEnvelope, UpdateListingRequest, User, EVENT_NEW_MESSAGE, EVENT_SEND_MESSAGE,
};
use toagro_client::{ApiClient, AppEvent, ClientConfig, ClientStorage, SessionHandle, Store};

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "Abcd1234";
pub const VALID_TOKEN: &str = "token-1";
pub const USER_ID: i64 = 1;
pub const TRANSACTION_ID: &str = "tx-500";

/// Delay applied to listing searches for `search=slow`.
pub const SLOW_SEARCH: Duration = Duration::from_millis(300);

#[derive(Default)]
pub struct MockBackend {
    pub listings: Mutex<Vec<Listing>>,
    pub upload_calls: AtomicUsize,
    pub rejected_requests: AtomicUsize,
    pub socket_frames: AtomicUsize,
    pub socket_connections: AtomicUsize,
}

pub struct Harness {
    pub config: ClientConfig,
    pub session: SessionHandle,
    pub store: Store,
    pub events_tx: async_channel::Sender<AppEvent>,
    pub events: Receiver<AppEvent>,
    pub backend: Arc<MockBackend>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_storage(ClientStorage::in_memory()).await
    }

    pub async fn with_storage(storage: ClientStorage) -> Self {
        let (base, backend) = spawn_backend().await;
        let mut config = ClientConfig::with_api_base(&base);
        config.reconnect_interval = Duration::from_millis(100);

        let session = SessionHandle::new();
        let (events_tx, events) = async_channel::unbounded();
        let api = ApiClient::new(&config, session.clone()).with_events(events_tx.clone());
        let store = Store::new(Arc::new(api), session.clone(), storage, events_tx.clone());

        Self {
            config,
            session,
            store,
            events_tx,
            events,
            backend,
        }
    }

    pub async fn sign_in(&self) {
        self.store
            .login(LoginRequest {
                email: EMAIL.to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("login against mock backend");
    }

    /// Everything published on the event channel so far.
    pub fn drain_events(&self) -> Vec<AppEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

pub fn user() -> User {
    User {
        id: USER_ID,
        email: EMAIL.to_string(),
        name: "Олена".to_string(),
        phone_number: None,
        role: Role::User,
        avatar: None,
        is_verified: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn listing(id: i64) -> Listing {
    Listing {
        id,
        title: format!("Пшениця, партія {id}"),
        description: "Озима пшениця третього класу, самовивіз".to_string(),
        price: 8500.0 + id as f64,
        location: "Вінниця".to_string(),
        category: "grain".to_string(),
        category_id: Some(3),
        user_id: USER_ID,
        images: Vec::new(),
        active: true,
        views: 0,
        created_at: Utc::now(),
        updated_at: None,
        user: None,
    }
}

fn payment(amount: f64, currency: &str, status: PaymentStatus) -> Payment {
    Payment {
        id: 1,
        owner_id: USER_ID,
        amount,
        currency: currency.to_string(),
        status,
        transaction_id: TRANSACTION_ID.to_string(),
        order_id: None,
        payment_method: None,
        created_at: Utc::now(),
        completed_at: None,
    }
}

pub async fn spawn_backend() -> (String, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend {
        listings: Mutex::new((1..=3).map(listing).collect()),
        ..Default::default()
    });

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(profile))
        .route("/api/listings", get(list_listings))
        .route("/api/listings/upload", post(upload_images))
        .route("/api/listings/{id}", put(update_listing))
        .route("/api/transactions", post(create_payment).get(list_payments))
        .route("/api/transactions/{transaction_id}", get(get_payment))
        .route("/api/chat/unread", get(unread_count))
        .route("/api/chat/conversations", get(conversations))
        .route("/ws", get(socket))
        .route("/ws/closing", get(closing_socket))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend crashed");
    });

    (format!("http://{addr}/api"), backend)
}

type Shared = State<Arc<MockBackend>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn rejected(backend: &MockBackend) -> Response {
    backend.rejected_requests.fetch_add(1, Ordering::SeqCst);
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

async fn login(Json(request): Json<LoginRequest>) -> Response {
    if request.email != EMAIL || request.password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))).into_response();
    }
    Json(AuthResponse {
        token: VALID_TOKEN.to_string(),
        user: user(),
    })
    .into_response()
}

async fn profile(State(backend): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    Json(ProfileResponse { user: user() }).into_response()
}

#[derive(Deserialize)]
struct ListingsQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
}

async fn list_listings(State(backend): Shared, Query(query): Query<ListingsQuery>) -> Response {
    if query.search.as_deref() == Some("slow") {
        tokio::time::sleep(SLOW_SEARCH).await;
    }
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let all = backend.listings.lock().clone();
    let start = ((page.saturating_sub(1)) * limit) as usize;
    let listings: Vec<Listing> = all.iter().skip(start).take(limit as usize).cloned().collect();
    Json(ListingsResponse {
        listings,
        meta: PageMeta::new(page, limit, all.len() as u64),
    })
    .into_response()
}

async fn update_listing(
    State(backend): Shared,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateListingRequest>,
) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    let mut listings = backend.listings.lock();
    let Some(listing) = listings.iter_mut().find(|l| l.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(title) = patch.title {
        listing.title = title.trim().to_string();
    }
    if let Some(price) = patch.price {
        listing.price = price;
    }
    listing.updated_at = Some(Utc::now());
    Json(ListingEnvelope {
        listing: listing.clone(),
    })
    .into_response()
}

async fn upload_images(State(backend): Shared, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    backend.upload_calls.fetch_add(1, Ordering::SeqCst);
    let mut urls = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.file_name().unwrap_or("image").to_string();
        urls.push(format!("/uploads/{name}"));
    }
    Json(json!({ "urls": urls })).into_response()
}

async fn create_payment(State(backend): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    let currency = body["currency"].as_str().unwrap_or_default();
    if currency != "UAH" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Unsupported currency", "errors": { "currency": "UAH only" } })),
        )
            .into_response();
    }
    let amount = body["amount"].as_f64().unwrap_or_default();
    Json(PaymentResponse {
        payment: payment(amount, currency, PaymentStatus::Pending),
        payment_link: format!("https://pay.example/{TRANSACTION_ID}"),
    })
    .into_response()
}

/// The gateway has confirmed the payment.
async fn get_payment(State(backend): Shared, headers: HeaderMap, Path(transaction_id): Path<String>) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    if transaction_id != TRANSACTION_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut confirmed = payment(500.0, "UAH", PaymentStatus::Completed);
    confirmed.completed_at = Some(Utc::now());
    Json(json!({ "payment": confirmed })).into_response()
}

/// A lagging read replica: still reports the payment as pending.
async fn list_payments(State(backend): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    Json(PaymentsResponse {
        payments: vec![payment(500.0, "UAH", PaymentStatus::Pending)],
    })
    .into_response()
}

async fn unread_count(State(backend): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    Json(json!({ "count": 2 })).into_response()
}

async fn conversations(State(backend): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return rejected(&backend);
    }
    Json(json!({ "conversations": [] })).into_response()
}

async fn socket(
    State(backend): Shared,
    Query(query): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if query.get("token").map(String::as_str) != Some(VALID_TOKEN) {
        return rejected(&backend);
    }
    ws.on_upgrade(move |socket| echo_messages(socket, backend))
}

/// Accepts the upgrade and hangs up straight away.
async fn closing_socket(State(backend): Shared, ws: WebSocketUpgrade) -> Response {
    backend.socket_connections.fetch_add(1, Ordering::SeqCst);
    ws.on_upgrade(|mut socket| async move {
        let _ = socket.send(WsMessage::Close(None)).await;
    })
}

/// Answers every `send_message` with the stored message as `new_message`.
async fn echo_messages(mut socket: WebSocket, backend: Arc<MockBackend>) {
    let mut next_id = 100;
    while let Some(Ok(frame)) = socket.recv().await {
        let WsMessage::Text(text) = frame else {
            continue;
        };
        backend.socket_frames.fetch_add(1, Ordering::SeqCst);
        let Ok(envelope) = serde_json::from_str::<SocketEnvelope>(text.as_str()) else {
            continue;
        };
        if envelope.event != EVENT_SEND_MESSAGE {
            continue;
        }
        let Ok(request) = serde_json::from_value::<SendMessageRequest>(envelope.data) else {
            continue;
        };
        next_id += 1;
        let message = Message {
            id: next_id,
            content: request.content,
            sender_id: USER_ID,
            receiver_id: request.receiver_id,
            listing_id: request.listing_id,
            created_at: Utc::now(),
            read_at: None,
            sender: None,
            receiver: None,
        };
        let push = SocketEnvelope::new(EVENT_NEW_MESSAGE, json!({ "message": message }));
        let Ok(payload) = serde_json::to_string(&push) else {
            continue;
        };
        if socket.send(WsMessage::Text(payload.into())).await.is_err() {
            break;
        }
    }
}
