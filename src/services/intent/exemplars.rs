use crate::models::Intent;

/// Canonical phrases per intent, in priority order for tie-breaking
pub const INTENT_EXAMPLES: &[(Intent, &[&str])] = &[
    (
        Intent::NuevaRecomendacion,
        &[
            "recomiéndame una película",
            "quiero ver algo nuevo",
            "sugiéreme una película",
            "busca películas de terror",
            "busca películas de acción",
            "busca películas de amor",
            "busca películas de Pixar",
            "busca películas de Disney",
            "busca películas de comedia",
            "busca películas de ciencia ficción",
            "busca películas de drama",
            "dame una recomendación",
            "quiero descubrir una película diferente",
            "qué película me recomiendas hoy",
        ],
    ),
    (
        Intent::VerRecomendaciones,
        &[
            "muéstrame las recomendaciones",
            "quiero ver las sugerencias",
            "enséñame mis recomendaciones anteriores",
            "lista de recomendaciones",
            "quiero revisar mis recomendaciones",
            "muestra las películas sugeridas",
            "ver recomendaciones guardadas",
        ],
    ),
    (
        Intent::CalificarRecomendaciones,
        &[
            "quiero calificar las recomendaciones",
            "quiero evaluar las sugerencias",
            "quiero poner calificación a las películas recomendadas",
            "quiero revisar y calificar las películas",
            "deseo evaluar las recomendaciones del sistema",
            "quiero asignar estrellas a las recomendaciones",
            "quiero dar mi opinión sobre las recomendaciones",
        ],
    ),
    (
        Intent::BuscarSimilares,
        &[
            "muéstrame películas parecidas a Inception",
            "quiero algo similar a Titanic",
            "películas como Matrix",
            "quiero ver algo parecido a Avatar",
            "recomiéndame algo del estilo de Shrek",
            "busca películas parecidas a Harry Potter",
            "dame opciones similares a El Señor de los Anillos",
        ],
    ),
    (
        Intent::VerTendencias,
        &[
            "qué películas están de moda",
            "muéstrame los estrenos de esta semana",
            "quiero ver las más populares",
            "dime las películas del momento",
            "enséñame las películas más vistas",
            "cuáles son los estrenos recientes",
            "muestra lo que está en tendencia",
        ],
    ),
];
