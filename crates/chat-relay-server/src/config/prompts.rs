//! Built-in prompt texts used when the configuration does not override them.

/// System turn that scopes every conversation to the school's admissions desk.
pub const DEFAULT_DOMAIN_CONTEXT: &str = r#"
Eres un asistente de dudas academicas, Para la escuela UNIR.
Informacion del negocio:
    - Ubicacion: Madrid, España
    - Horario: Lunes a Viernes de 9:00 a 18:00
    - Carreras: Ingenieria Informatica, Administracion de Empresas, Psicologia, Derecho , Medicina
    - Papeles importantes: acta de nacimiento, certificado de estudios, identificacion oficial
    - Costos de inscripcion: 100
    - costo semestre: 5000,
    - Costo mensualidad: 1000
    - Pagos: efectivo, tarjeta de credito, transferencia bancaria
Solo puedes preguntar preguntas relacionadas con la escuela UNIR, no puedes hacer preguntas sobre otros temas.
"#;

/// Priming user turn asking the model to keep answers short.
pub const DEFAULT_BREVITY_INSTRUCTION: &str =
    "Debes de responder de la forma mas corta posible, Usando los minimos tokens posibles";

/// Returned to the client when `message` is empty or missing.
pub const EMPTY_MESSAGE_ERROR: &str = "Has mandado un mensaje vacio!!";

/// Returned to the client for every backend or internal failure.
pub const GENERIC_FAILURE_ERROR: &str = "Error al procesar la solicitud";

/// Used by the document-query path when the service answers without text.
pub const DEFAULT_RAG_FALLBACK_REPLY: &str = "No se pudo obtener una respuesta.";
