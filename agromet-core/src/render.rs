use crate::{
    form::{FormState, PredictionForm},
    model::{PredictionResult, SeriesEntry},
};

pub const NO_DATA_MESSAGE: &str = "No hay datos disponibles para mostrar.";
pub const SERIES_ERROR_MESSAGE: &str = "Error al obtener datos del servidor";

/// Text view of the form outcome, one line per displayed item.
pub fn render_form(form: &PredictionForm) -> String {
    render_state(form.state())
}

pub fn render_state(state: &FormState) -> String {
    match state {
        FormState::Failure(msg) => msg.clone(),
        FormState::Success { date, result } => render_result(date.as_str(), result),
        FormState::Idle => NO_DATA_MESSAGE.to_string(),
    }
}

fn render_result(date: &str, r: &PredictionResult) -> String {
    let mut lines = vec![
        format!("Predicciones para {date}:"),
        format!("Temperatura: {:.2} °C", r.temperatura),
        format!("Precipitación: {:.2} mm", r.precipitacion),
        format!("Humedad: {:.2} %", r.humedad),
        format!("Dirección del Viento: {:.2} grados", r.direccion_viento),
    ];
    if let Some(desc) = &r.descripcion_clima {
        lines.push(format!("Descripción del Clima: {desc}"));
    }
    if let Some(aqi) = r.calidad_aire {
        lines.push(format!("Calidad del Aire: {aqi:.2}"));
    }
    lines.join("\n")
}

/// Temperature series as `fecha: temperatura °C` lines.
pub fn render_series(entries: &[SeriesEntry]) -> String {
    if entries.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    std::iter::once("Predicción de Temperatura".to_string())
        .chain(entries.iter().map(|e| format!("{}: {:.2} °C", e.fecha, e.temperatura)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FAILURE_MESSAGE;
    use crate::model::DateInput;
    use crate::service::HttpPredictionService;
    use axum::{Json, Router, routing::post};
    use serde_json::json;
    use std::time::Duration;

    fn success(result: PredictionResult) -> FormState {
        FormState::Success { date: DateInput::new("15-07-2025").unwrap(), result }
    }

    fn base_result() -> PredictionResult {
        serde_json::from_str(
            r#"{"temperatura":21.5,"precipitacion":3.2,"humedad":60.0,"direccion_viento":180.0}"#,
        )
        .unwrap()
    }

    #[test]
    fn renders_metrics_with_two_decimals() {
        let text = render_state(&success(base_result()));

        assert_eq!(
            text,
            "Predicciones para 15-07-2025:\n\
             Temperatura: 21.50 °C\n\
             Precipitación: 3.20 mm\n\
             Humedad: 60.00 %\n\
             Dirección del Viento: 180.00 grados"
        );
    }

    #[test]
    fn renders_optional_fields_when_present() {
        let mut result = base_result();
        result.descripcion_clima = Some("Parcialmente nublado".into());
        result.calidad_aire = Some(42.0);

        let text = render_state(&success(result));
        assert!(text.contains("Descripción del Clima: Parcialmente nublado"));
        assert!(text.ends_with("Calidad del Aire: 42.00"));
    }

    #[test]
    fn failure_shows_only_message() {
        let text = render_state(&FormState::Failure(FAILURE_MESSAGE.to_string()));
        assert_eq!(text, FAILURE_MESSAGE);
        assert!(!text.contains("Temperatura"));
    }

    #[test]
    fn idle_shows_placeholder() {
        let form = PredictionForm::new();
        assert_eq!(render_form(&form), NO_DATA_MESSAGE);
    }

    #[test]
    fn series_lines_and_placeholder() {
        assert_eq!(render_series(&[]), NO_DATA_MESSAGE);

        let entries: Vec<SeriesEntry> = serde_json::from_str(
            r#"[{"fecha":"01-01-2025","temperatura":30.126},{"fecha":"02-01-2025","temperatura":29}]"#,
        )
        .unwrap();
        assert_eq!(
            render_series(&entries),
            "Predicción de Temperatura\n01-01-2025: 30.13 °C\n02-01-2025: 29.00 °C"
        );
    }

    #[test]
    fn description_is_shown_verbatim_as_last_line() {
        let mut result = base_result();
        result.descripcion_clima = Some("Lluvias aisladas  ".into());

        let text = render_state(&success(result));
        assert!(text.ends_with("Descripción del Clima: Lluvias aisladas  "));
    }

    async fn form_after_submit(service: &HttpPredictionService, date: &str) -> PredictionForm {
        let mut form = PredictionForm::new();
        form.on_date_change(date);
        form.submit(service).await.unwrap();
        form
    }

    #[tokio::test]
    async fn unreachable_service_renders_only_the_failure_message() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let svc = HttpPredictionService::new(&format!("http://{addr}"), Duration::from_secs(5))
            .unwrap();
        let form = form_after_submit(&svc, "10-10-2025").await;

        let text = render_form(&form);
        assert_eq!(text, FAILURE_MESSAGE);
        assert!(!text.contains("Temperatura"));
        assert!(!text.contains("grados"));
    }

    #[tokio::test]
    async fn served_prediction_renders_formatted_metrics() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                Json(json!({
                    "temperatura": 21.5,
                    "precipitacion": 3.2,
                    "humedad": 60.0,
                    "direccion_viento": 180.0
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let svc = HttpPredictionService::new(&format!("http://{addr}"), Duration::from_secs(5))
            .unwrap();
        let form = form_after_submit(&svc, "15-07-2025").await;

        let text = render_form(&form);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Predicciones para 15-07-2025:",
                "Temperatura: 21.50 °C",
                "Precipitación: 3.20 mm",
                "Humedad: 60.00 %",
                "Dirección del Viento: 180.00 grados",
            ]
        );
        assert!(!text.contains(FAILURE_MESSAGE));
    }
}
