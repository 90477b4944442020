use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use charterdesk::Config;
use charterdesk::database::{
    init_database,
    repositories::{
        AvailabilityRepository, BoatRepository, BookingRepository, CompanyRepository,
        CrewRepository, HistoryRepository, PaymentRepository, PricingRepository,
        WaitlistRepository,
    },
};
use charterdesk::handlers::{
    availability, bookings, company, crew, payments, pricing, waitlist,
};
use charterdesk::services::{BookingService, EventPublisher, HoldSweeper, LedgerService};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("CharterDesk API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let booking_repository = BookingRepository::new(pool.clone());
    let availability_repository = AvailabilityRepository::new(pool.clone());
    let boat_repository = BoatRepository::new(pool.clone());
    let crew_repository = CrewRepository::new(pool.clone());
    let company_repository = CompanyRepository::new(pool.clone());
    let pricing_repository = PricingRepository::new(pool.clone());
    let payment_repository = PaymentRepository::new(pool.clone());
    let history_repository = HistoryRepository::new(pool.clone());
    let waitlist_repository = WaitlistRepository::new(pool.clone());

    let events = EventPublisher::default();
    let booking_service = BookingService::new(
        booking_repository.clone(),
        availability_repository.clone(),
        boat_repository.clone(),
        crew_repository.clone(),
        pricing_repository.clone(),
        company_repository.clone(),
        events.clone(),
        config.clone(),
    );
    let ledger_service = LedgerService::new(
        payment_repository.clone(),
        history_repository.clone(),
        events.clone(),
    );

    let sweeper = HoldSweeper::new(booking_repository.clone(), events.clone());
    tokio::spawn(
        sweeper
            .clone()
            .run(Duration::from_secs(config.sweep_interval_secs)),
    );
    log::info!(
        "Hold sweeper running every {}s (holds live {} minutes)",
        config.sweep_interval_secs,
        config.hold_minutes
    );

    let booking_repo_data = web::Data::new(booking_repository);
    let availability_repo_data = web::Data::new(availability_repository);
    let boat_repo_data = web::Data::new(boat_repository);
    let crew_repo_data = web::Data::new(crew_repository);
    let company_repo_data = web::Data::new(company_repository);
    let pricing_repo_data = web::Data::new(pricing_repository);
    let history_repo_data = web::Data::new(history_repository);
    let waitlist_repo_data = web::Data::new(waitlist_repository);
    let booking_service_data = web::Data::new(booking_service);
    let ledger_service_data = web::Data::new(ledger_service);
    let sweeper_data = web::Data::new(sweeper);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(booking_repo_data.clone())
            .app_data(availability_repo_data.clone())
            .app_data(boat_repo_data.clone())
            .app_data(crew_repo_data.clone())
            .app_data(company_repo_data.clone())
            .app_data(pricing_repo_data.clone())
            .app_data(history_repo_data.clone())
            .app_data(waitlist_repo_data.clone())
            .app_data(booking_service_data.clone())
            .app_data(ledger_service_data.clone())
            .app_data(sweeper_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/bookings")
                            .route("", web::post().to(bookings::create_booking))
                            .route("", web::get().to(bookings::list_bookings))
                            .route("/{id}", web::get().to(bookings::get_booking))
                            .route("/{id}", web::put().to(bookings::update_booking))
                            .route("/{id}/confirm", web::post().to(bookings::confirm_booking))
                            .route("/{id}/cancel", web::post().to(bookings::cancel_booking))
                            .route("/{id}/complete", web::post().to(bookings::complete_booking))
                            .route("/{id}/no-show", web::post().to(bookings::mark_no_show))
                            .route("/{id}/history", web::get().to(bookings::booking_history))
                            .route("/sweep-holds", web::post().to(bookings::sweep_holds))
                            .route(
                                "/{id}/transactions",
                                web::post().to(payments::record_transaction),
                            )
                            .route(
                                "/{id}/transactions",
                                web::get().to(payments::booking_ledger),
                            ),
                    )
                    .service(
                        web::scope("/availability")
                            .route("", web::get().to(availability::find_available_boats)),
                    )
                    .service(
                        web::scope("/boats")
                            .route("", web::get().to(availability::list_boats)),
                    )
                    .service(
                        web::scope("/blocked-slots")
                            .route("", web::post().to(availability::create_blocked_slot))
                            .route(
                                "/{id}",
                                web::delete().to(availability::delete_blocked_slot),
                            ),
                    )
                    .service(
                        web::scope("/crew").route("", web::get().to(crew::list_crew)),
                    )
                    .service(
                        web::scope("/pricing")
                            .route("", web::get().to(pricing::list_pricing))
                            .route("", web::post().to(pricing::create_pricing))
                            .route("/{id}", web::put().to(pricing::update_price)),
                    )
                    .service(
                        web::scope("/company")
                            .route("", web::get().to(company::get_company))
                            .route("/settings", web::put().to(company::update_settings)),
                    )
                    .service(
                        web::scope("/waitlist")
                            .route("", web::post().to(waitlist::create_entry))
                            .route("", web::get().to(waitlist::list_entries))
                            .route("/{id}/status", web::post().to(waitlist::update_status))
                            .route("/{id}/convert", web::post().to(waitlist::convert_entry)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
