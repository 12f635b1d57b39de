//! Flight telemetry panel

use carryall::vehicle::{Carryall, FlightState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::Indicators;

fn led(on: bool, color: Color) -> Span<'static> {
    if on {
        Span::styled("●", Style::default().fg(color))
    } else {
        Span::styled("○", Style::default().fg(Color::DarkGray))
    }
}

pub fn render_telemetry(
    frame: &mut Frame,
    area: Rect,
    vehicle: &Carryall,
    indicators: &Indicators,
    hold: bool,
) {
    let block = Block::default().title(" carryall ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let p = vehicle.position();
    let v = vehicle.velocity();
    let camera = p + vehicle.avg_velocity();
    let controls = vehicle.controls();

    let state = match vehicle.state() {
        FlightState::Flying => Span::styled("FLYING", Style::default().fg(Color::Green)),
        FlightState::Destroying { since } => Span::styled(
            format!("DESTROYED at {:.1}s", since.as_secs_f64()),
            Style::default().fg(Color::Red),
        ),
    };

    let lines = vec![
        Line::from(vec![
            state,
            Span::raw("   stress "),
            led(indicators.stress, Color::Red),
            Span::raw("  spin-up "),
            led(indicators.spin_up, Color::Yellow),
            Span::raw(if hold { "  [HOLD]" } else { "" }),
        ]),
        Line::from(format!(
            "pos   {:>8.1} {:>8.1}   vel {:>7.2} {:>7.2}   cam {:>8.1} {:>8.1}",
            p.x, p.y, v.x, v.y, camera.x, camera.y
        )),
        Line::from(format!(
            "body  {:>+6.2} rad   engine {:>+6.2} rad   pressure {:.2}",
            vehicle.body_rotation(),
            vehicle.engine_rotation(),
            vehicle.atmo_pressure()
        )),
        Line::from(format!(
            "stab  {:>5.2}   main {:>+5.2}   stress {:>5.2}   drag {:>5.3}",
            vehicle.current_stability_power(),
            vehicle.current_engine_power(),
            vehicle.acceleration_stress(),
            vehicle.current_drag().length()
        )),
        Line::from(Span::styled(
            format!(
                "faders  left {:.2}  right {:.2}  cross {:.2}",
                controls.left_balance, controls.right_balance, controls.middle_balance
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let rows = inner.height.saturating_sub(2);
    let text_area = Rect { height: rows, ..inner };
    frame.render_widget(Paragraph::new(lines), text_area);

    if inner.height >= 2 {
        let gauge_area = Rect {
            y: inner.y + rows,
            height: 1,
            ..inner
        };
        let spin_up = vehicle.spin_up().level().clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Yellow))
            .label(format!("spin-up {:.0}%", spin_up * 100.0))
            .ratio(spin_up);
        frame.render_widget(gauge, gauge_area);

        let throttle_area = Rect {
            y: inner.y + rows + 1,
            height: 1,
            ..inner
        };
        let throttle = vehicle.throttle().clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .label(format!("throttle {:.0}%", throttle * 100.0))
            .ratio(throttle);
        frame.render_widget(gauge, throttle_area);
    }
}
