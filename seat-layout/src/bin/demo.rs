//! Seat layout demo binary
//!
//! Opens an editing session for a luxury ferry, reshapes the layout, reacts
//! to a capacity change and saves, printing the grid along the way.

use ferry_seat_layout::editor::LayoutSummary;
use ferry_seat_layout::{
    EditorAction, EditorEnvironment, EditorMode, EditorSettings, EditorState, GridPosition,
    LayoutEditorSession, LayoutSink, Seat, SeatLayout, SeatType, SessionInput, VesselId,
    VesselType,
};
use futures::future::BoxFuture;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sink that stands in for the host: logs notifications, accepts saves
struct LoggingSink;

impl LayoutSink for LoggingSink {
    fn on_change(&self, layout: SeatLayout, seats: Vec<Seat>) {
        tracing::info!(
            name = %layout.layout_name,
            rows = layout.layout_data.config.rows,
            columns = layout.layout_data.config.columns,
            seats = seats.len(),
            "Host received layout change"
        );
    }

    fn save(&self, layout: SeatLayout, seats: Vec<Seat>) -> BoxFuture<'static, anyhow::Result<()>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            tracing::info!(name = %layout.layout_name, seats = seats.len(), "Host stored layout");
            Ok(())
        })
    }
}

fn render(state: &EditorState) -> String {
    let mut out = String::new();
    for row in 1..=state.config.rows {
        if state.config.row_aisles.contains(&row) {
            out.push('\n');
        }
        let _ = write!(out, "{row:>3} ");
        for column in 1..=state.config.columns {
            if state.config.aisles.contains(&column) {
                out.push_str("  ");
            }
            let cell = match state.grid.seat_at(GridPosition::new(row, column)) {
                None => '.',
                Some(seat) => match seat.seat_type {
                    SeatType::Standard => 'o',
                    SeatType::Premium => 'P',
                    SeatType::Crew => 'C',
                    SeatType::Disabled => 'x',
                },
            };
            out.push(cell);
        }
        out.push('\n');
    }
    out
}

fn describe(summary: &LayoutSummary) -> String {
    format!(
        "{} of {} seats active ({} premium, {} crew, {} disabled, {} window, {} empty cells)",
        summary.active_seats,
        summary.capacity,
        summary.premium_seats,
        summary.crew_seats,
        summary.disabled_seats,
        summary.window_seats,
        summary.empty_cells,
    )
}

async fn show(session: &LayoutEditorSession, title: &str) {
    let grid = session.state(render).await;
    let summary = session.summary().await;
    println!("\n=== {title} ===\n{grid}{}", describe(&summary));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_seat_layout=debug,ferry_seating_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = EditorSettings::from_env();
    let quiet = settings.notify_debounce() + Duration::from_millis(100);
    let env = EditorEnvironment::production(Arc::new(LoggingSink), settings);

    let session = LayoutEditorSession::open(
        SessionInput::new(VesselId::new(), 38, VesselType::Luxury),
        env,
    )
    .await?;
    show(&session, "Generated layout").await;
    tokio::time::sleep(quiet).await;

    // A burst of edits collapses into a single notification
    session.send(EditorAction::ToggleAisle { column: 2 }).await?;
    session.send(EditorAction::ToggleCrewSeat { seat_number: "A1".to_string() }).await?;
    session.send(EditorAction::TogglePremiumRow { row: 3 }).await?;
    session.send(EditorAction::TogglePremiumRow { row: 3 }).await?;
    tokio::time::sleep(quiet).await;
    show(&session, "After zone edits").await;

    session.send(EditorAction::SetMode(EditorMode::Edit)).await?;
    session.send(EditorAction::CellTapped(GridPosition::new(1, 1))).await?;
    if let Some(request) = session.state(|s| s.editing.clone()).await {
        let mut form = request.form();
        form.seat_type = SeatType::Disabled;
        session
            .send(EditorAction::SeatEditSubmitted(form.validate()?))
            .await?;
    }

    session.send(EditorAction::CapacityChanged { capacity: 52 }).await?;
    show(&session, "After capacity grew to 52").await;

    session.send(EditorAction::Save).await?;
    if session.state(|s| s.pending_confirmation.is_some()).await {
        println!("\nCapacity mismatch, saving anyway");
        session.send(EditorAction::Confirm).await?;
    }
    tokio::time::sleep(quiet).await;

    let (layout, seats) = session.snapshot().await;
    println!("\nSaved \"{}\" with {} seats", layout.layout_name, seats.len());
    println!("{}", serde_json::to_string_pretty(&layout.layout_data)?);

    session.close();
    Ok(())
}
