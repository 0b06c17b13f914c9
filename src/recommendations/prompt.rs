//! Prompt construction from stored route metadata and route statistics

use serde_json::Value as JsonValue;

use crate::analysis::RouteAnalysis;

const NOT_SPECIFIED: &str = "No especificado";

/// Deployment settings as recorded in a route's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSettings {
    pub architecture: String,
    pub architecture_label: String,
    pub split_ratio: String,
    pub construction: String,
    pub construction_label: String,
    pub sub_configuration: String,
    pub client_estimate: String,
}

impl ProjectSettings {
    /// Read settings from metadata, falling back to labels' raw values and
    /// then to "No especificado"
    pub fn from_metadata(metadata: &JsonValue) -> Self {
        let field = |key: &str| metadata.get(key).and_then(display_value);

        let architecture = field("arquitectura").unwrap_or_else(|| "No especificada".to_string());
        let construction = field("enfoque").unwrap_or_else(|| NOT_SPECIFIED.to_string());

        Self {
            architecture_label: field("arquitectura_label").unwrap_or_else(|| architecture.clone()),
            architecture,
            split_ratio: field("split").unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            construction_label: field("enfoque_label").unwrap_or_else(|| construction.clone()),
            construction,
            sub_configuration: field("subconfig_label")
                .or_else(|| field("subconfig"))
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            client_estimate: field("estudio_factibilidad")
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        }
    }
}

fn display_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Build the recommendation prompt for a route
pub fn build_prompt(settings: &ProjectSettings, analysis: &RouteAnalysis, region_name: &str) -> String {
    let (center_lat, center_lon) = analysis.center_coordinates;

    format!(
        r#"
Eres un ingeniero de telecomunicaciones con experiencia en el diseño y despliegue de redes FTTH (Fiber to the Home).
Revisa los datos del proyecto y entrega recomendaciones técnicas concretas.

DATOS DEL PROYECTO:
- Arquitectura de red: {architecture_label} ({architecture})
- Tecnología/Topología: {sub_configuration}
- Relación de split: {split_ratio}
- Tipo de construcción: {construction_label} ({construction})
- Número estimado de clientes: {client_estimate}

ANÁLISIS DE LA RUTA:
- Longitud total: {length_km} km
- Zona geográfica: {zone_type}
- Complejidad del terreno: {terrain}
- Ubicación central: ({center_lat}, {center_lon})
- Puntos de muestreo: {total_points}

CONTEXTO:
La ruta se ubica en {region_name}. Ten en cuenta el clima local, la normativa de
telecomunicaciones vigente y las condiciones urbanas habituales de la zona.

ESTRUCTURA DE LA RESPUESTA:

1. RESUMEN EJECUTIVO (2-3 líneas): estado general, viabilidad técnica y advertencias críticas.

2. RECOMENDACIONES TÉCNICAS: equipos sugeridos, consideraciones de instalación y ajustes
   según la configuración elegida.

3. FACTORES DE COSTO: elementos que encarecen el proyecto, oportunidades de ahorro y
   complejidad estimada (Baja/Media/Alta).

4. EVALUACIÓN DE RIESGOS: riesgos técnicos, mitigaciones y aspectos regulatorios.

5. ESTRATEGIA DE DESPLIEGUE: fases de implementación, cronograma aproximado y recursos.

Usa terminología profesional de FTTH y prioriza recomendaciones accionables.
"#,
        architecture_label = settings.architecture_label,
        architecture = settings.architecture,
        sub_configuration = settings.sub_configuration,
        split_ratio = settings.split_ratio,
        construction_label = settings.construction_label,
        construction = settings.construction,
        client_estimate = settings.client_estimate,
        length_km = analysis.length_km,
        zone_type = analysis.zone_type,
        terrain = analysis.terrain_complexity,
        total_points = analysis.total_points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{TerrainComplexity, ZoneType};
    use serde_json::json;

    fn analysis() -> RouteAnalysis {
        RouteAnalysis {
            length_km: 1.57,
            total_points: 4,
            zone_type: ZoneType::Urbano,
            terrain_complexity: TerrainComplexity::Medio,
            center_coordinates: (-2.175, -79.905),
        }
    }

    #[test]
    fn test_settings_from_full_metadata() {
        let settings = ProjectSettings::from_metadata(&json!({
            "arquitectura": "gpon",
            "arquitectura_label": "GPON",
            "split": "1:32",
            "enfoque": "aereo",
            "enfoque_label": "Aéreo",
            "subconfig": "centralizada",
            "subconfig_label": "Split centralizado",
            "estudio_factibilidad": 250
        }));

        assert_eq!(settings.architecture_label, "GPON");
        assert_eq!(settings.construction_label, "Aéreo");
        assert_eq!(settings.sub_configuration, "Split centralizado");
        assert_eq!(settings.client_estimate, "250");
    }

    #[test]
    fn test_settings_fall_back() {
        let settings = ProjectSettings::from_metadata(&json!({
            "arquitectura": "gpon",
            "subconfig": "distribuida",
            "split": ""
        }));

        assert_eq!(settings.architecture_label, "gpon");
        assert_eq!(settings.sub_configuration, "distribuida");
        assert_eq!(settings.split_ratio, NOT_SPECIFIED);
        assert_eq!(settings.construction, NOT_SPECIFIED);
        assert_eq!(settings.construction_label, NOT_SPECIFIED);
    }

    #[test]
    fn test_settings_from_non_object_metadata() {
        let settings = ProjectSettings::from_metadata(&JsonValue::Null);
        assert_eq!(settings.architecture, "No especificada");
        assert_eq!(settings.client_estimate, NOT_SPECIFIED);
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let settings = ProjectSettings::from_metadata(&json!({ "arquitectura": "gpon", "split": "1:16" }));
        let prompt = build_prompt(&settings, &analysis(), "Guayaquil, Ecuador");

        assert!(prompt.contains("Relación de split: 1:16"));
        assert!(prompt.contains("Longitud total: 1.57 km"));
        assert!(prompt.contains("Zona geográfica: urbano"));
        assert!(prompt.contains("Complejidad del terreno: medio"));
        assert!(prompt.contains("Ubicación central: (-2.175, -79.905)"));
        assert!(prompt.contains("Guayaquil, Ecuador"));
    }
}
