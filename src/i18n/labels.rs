//! Static localized labels.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    match lang {
        "es" => spanish(key),
        "de" => german(key),
        _ => None,
    }
    .or_else(|| english(key))
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "service_unavailable" => "⚠️ The habit service is unavailable right now. Please try again in a moment.",
        "btn_back" => "⬅️ Back",
        "btn_yes" => "✅ Yes",
        "btn_no" => "❌ No",
        "btn_done" => "✅ Done",
        "btn_confirm" => "✅ Confirm",
        "btn_save" => "💾 Save",
        "btn_prev" => "◀️",
        "btn_next" => "▶️",
        "welcome" => "👋 Welcome! Let's set up your profile first.",
        "registration_done" => "🎉 All set! Here is what I can do:",
        "send_any_text" => "Send me any message to get started.",
        "choose_language" => "🌐 Choose your language:",
        "language_saved" => "✅ Language saved.",
        "timezone_prompt" => "🕒 Type your city or timezone, for example: Madrid, New York, Asia/Tokyo.",
        "timezone_no_matches" => "🤷 No timezone matches that. Try another city or region.",
        "timezone_too_many" => "🔎 Too many matches. Please be more specific.",
        "timezone_pick" => "Pick your timezone:",
        "timezone_saved" => "✅ Timezone saved.",
        "help_text" => "Habitual helps you build habits with reminders.\n\n\
            /add_habit - create a new habit\n\
            /my_habits - list, edit or delete habits\n\
            /today - today's reminders\n\
            /progress - your overall progress\n\
            /settings - language and timezone\n\
            /help - this message",
        "cmd_start" => "Start the bot",
        "cmd_help" => "What I can do",
        "cmd_add_habit" => "Create a new habit",
        "cmd_my_habits" => "List your habits",
        "cmd_today" => "Today's reminders",
        "cmd_progress" => "Your progress",
        "cmd_settings" => "Settings",
        "cmd_language" => "Change language",
        "cmd_timezone" => "Change timezone",
        "settings_header" => "⚙️ Settings",
        "btn_language" => "🌐 Language",
        "btn_timezone" => "🕒 Timezone",
        "my_habits_header" => "📋 Your habits",
        "no_habits" => "You have no habits yet. Use /add_habit to create one.",
        "habit_deleted" => "🗑 Habit deleted.",
        "habit_not_found" => "That habit no longer exists.",
        "todays_header" => "📅 Today's reminders. Tap one when it's done:",
        "no_notifications_today" => "Nothing scheduled for today. 🎈",
        "any_time" => "any time",
        "marked_done" => "✅ Marked as done",
        "wizard_create_header" => "🆕 New habit",
        "wizard_edit_header" => "✏️ Edit habit",
        "field_name" => "Name",
        "field_description" => "Description",
        "field_times_per_day" => "Times per day",
        "field_start_date" => "Start date",
        "field_end_date" => "End date",
        "field_recurrence" => "Repeat",
        "field_notifications" => "Reminders",
        "prompt_name" => "Send the habit name.",
        "prompt_description" => "Send a short description.",
        "prompt_times_per_day" => "How many times per day?",
        "prompt_start_date" => "When do you start? (today, tomorrow, friday, 2026-11-01 ...)",
        "prompt_end_date" => "When does it end? (in 30 days, 31.12.2026 ...)",
        "prompt_recurrence" => "How often does it repeat?",
        "prompt_days_weekly" => "Toggle the weekdays, then press Done.",
        "prompt_days_monthly" => "Toggle the days of the month, then press Done.",
        "prompt_notifications" => "Send a reminder time like 08:30. Tap a time to remove it.",
        "err_name_taken" => "You already have a habit with that name.",
        "err_not_a_number" => "Please send a positive whole number.",
        "err_times_locked" => "Times per day follows your reminders. Remove reminders to change it.",
        "err_bad_date" => "I couldn't understand that date.",
        "err_end_before_start" => "The end date can't be before the start date.",
        "err_bad_time" => "I couldn't understand that time. Try 08:30.",
        "err_use_buttons" => "Please use the buttons below.",
        "err_name_required" => "Give the habit a name first.",
        "rec_daily" => "Daily",
        "rec_weekly" => "Weekly",
        "rec_monthly" => "Monthly",
        "wd_0" => "Mon",
        "wd_1" => "Tue",
        "wd_2" => "Wed",
        "wd_3" => "Thu",
        "wd_4" => "Fri",
        "wd_5" => "Sat",
        "wd_6" => "Sun",
        "not_set" => "—",
        "your_habit" => "your habit",
        "tagline_0" => "Small steps every day add up. 🌱",
        "tagline_1" => "Consistency beats intensity. 💪",
        "tagline_2" => "You don't have to be perfect, just keep going. 🚶",
        "tagline_3" => "Every check mark is a vote for who you want to be. ✅",
        "tagline_4" => "Progress, not perfection. ✨",
        _ => return None,
    })
}

fn spanish(key: &str) -> Option<&'static str> {
    Some(match key {
        "service_unavailable" => "⚠️ El servicio de hábitos no está disponible ahora. Inténtalo de nuevo en un momento.",
        "btn_back" => "⬅️ Atrás",
        "btn_yes" => "✅ Sí",
        "btn_no" => "❌ No",
        "btn_done" => "✅ Listo",
        "btn_confirm" => "✅ Confirmar",
        "btn_save" => "💾 Guardar",
        "welcome" => "👋 ¡Bienvenido! Primero configuremos tu perfil.",
        "registration_done" => "🎉 ¡Todo listo! Esto es lo que puedo hacer:",
        "send_any_text" => "Envíame cualquier mensaje para empezar.",
        "choose_language" => "🌐 Elige tu idioma:",
        "language_saved" => "✅ Idioma guardado.",
        "timezone_prompt" => "🕒 Escribe tu ciudad o zona horaria, por ejemplo: Madrid, New York, Asia/Tokyo.",
        "timezone_no_matches" => "🤷 Ninguna zona horaria coincide. Prueba otra ciudad o región.",
        "timezone_too_many" => "🔎 Demasiadas coincidencias. Sé más específico.",
        "timezone_pick" => "Elige tu zona horaria:",
        "timezone_saved" => "✅ Zona horaria guardada.",
        "help_text" => "Habitual te ayuda a crear hábitos con recordatorios.\n\n\
            /add_habit - crear un hábito nuevo\n\
            /my_habits - ver, editar o borrar hábitos\n\
            /today - recordatorios de hoy\n\
            /progress - tu progreso general\n\
            /settings - idioma y zona horaria\n\
            /help - este mensaje",
        "cmd_start" => "Iniciar el bot",
        "cmd_help" => "Qué puedo hacer",
        "cmd_add_habit" => "Crear un hábito nuevo",
        "cmd_my_habits" => "Ver tus hábitos",
        "cmd_today" => "Recordatorios de hoy",
        "cmd_progress" => "Tu progreso",
        "cmd_settings" => "Ajustes",
        "cmd_language" => "Cambiar idioma",
        "cmd_timezone" => "Cambiar zona horaria",
        "settings_header" => "⚙️ Ajustes",
        "btn_language" => "🌐 Idioma",
        "btn_timezone" => "🕒 Zona horaria",
        "my_habits_header" => "📋 Tus hábitos",
        "no_habits" => "Aún no tienes hábitos. Usa /add_habit para crear uno.",
        "habit_deleted" => "🗑 Hábito eliminado.",
        "habit_not_found" => "Ese hábito ya no existe.",
        "todays_header" => "📅 Recordatorios de hoy. Toca uno cuando lo completes:",
        "no_notifications_today" => "Nada programado para hoy. 🎈",
        "any_time" => "a cualquier hora",
        "marked_done" => "✅ Marcado como hecho",
        "wizard_create_header" => "🆕 Hábito nuevo",
        "wizard_edit_header" => "✏️ Editar hábito",
        "field_name" => "Nombre",
        "field_description" => "Descripción",
        "field_times_per_day" => "Veces al día",
        "field_start_date" => "Fecha de inicio",
        "field_end_date" => "Fecha de fin",
        "field_recurrence" => "Repetición",
        "field_notifications" => "Recordatorios",
        "prompt_name" => "Envía el nombre del hábito.",
        "prompt_description" => "Envía una descripción breve.",
        "prompt_times_per_day" => "¿Cuántas veces al día?",
        "prompt_start_date" => "¿Cuándo empiezas? (hoy, mañana, viernes, 2026-11-01 ...)",
        "prompt_end_date" => "¿Cuándo termina? (in 30 days, 31.12.2026 ...)",
        "prompt_recurrence" => "¿Con qué frecuencia se repite?",
        "prompt_days_weekly" => "Marca los días de la semana y pulsa Listo.",
        "prompt_days_monthly" => "Marca los días del mes y pulsa Listo.",
        "prompt_notifications" => "Envía una hora como 08:30. Toca una hora para quitarla.",
        "err_name_taken" => "Ya tienes un hábito con ese nombre.",
        "err_not_a_number" => "Envía un número entero positivo.",
        "err_times_locked" => "Las veces al día siguen a tus recordatorios. Quita recordatorios para cambiarlo.",
        "err_bad_date" => "No entendí esa fecha.",
        "err_end_before_start" => "La fecha de fin no puede ser anterior a la de inicio.",
        "err_bad_time" => "No entendí esa hora. Prueba 08:30.",
        "err_use_buttons" => "Usa los botones de abajo.",
        "err_name_required" => "Primero ponle un nombre al hábito.",
        "rec_daily" => "Diario",
        "rec_weekly" => "Semanal",
        "rec_monthly" => "Mensual",
        "wd_0" => "Lun",
        "wd_1" => "Mar",
        "wd_2" => "Mié",
        "wd_3" => "Jue",
        "wd_4" => "Vie",
        "wd_5" => "Sáb",
        "wd_6" => "Dom",
        "your_habit" => "tu hábito",
        "tagline_0" => "Los pasos pequeños de cada día suman. 🌱",
        "tagline_1" => "La constancia vence a la intensidad. 💪",
        "tagline_2" => "No tienes que ser perfecto, solo seguir. 🚶",
        "tagline_3" => "Cada marca es un voto por quien quieres ser. ✅",
        "tagline_4" => "Progreso, no perfección. ✨",
        _ => return None,
    })
}

fn german(key: &str) -> Option<&'static str> {
    Some(match key {
        "service_unavailable" => "⚠️ Der Gewohnheitsdienst ist gerade nicht erreichbar. Bitte versuche es gleich noch einmal.",
        "btn_back" => "⬅️ Zurück",
        "btn_yes" => "✅ Ja",
        "btn_no" => "❌ Nein",
        "btn_done" => "✅ Fertig",
        "btn_confirm" => "✅ Bestätigen",
        "btn_save" => "💾 Speichern",
        "welcome" => "👋 Willkommen! Lass uns zuerst dein Profil einrichten.",
        "registration_done" => "🎉 Alles bereit! Das kann ich für dich tun:",
        "send_any_text" => "Schick mir eine beliebige Nachricht, um loszulegen.",
        "choose_language" => "🌐 Wähle deine Sprache:",
        "language_saved" => "✅ Sprache gespeichert.",
        "timezone_prompt" => "🕒 Gib deine Stadt oder Zeitzone ein, zum Beispiel: Berlin, New York, Asia/Tokyo.",
        "timezone_no_matches" => "🤷 Keine Zeitzone passt. Versuche eine andere Stadt oder Region.",
        "timezone_too_many" => "🔎 Zu viele Treffer. Bitte genauer angeben.",
        "timezone_pick" => "Wähle deine Zeitzone:",
        "timezone_saved" => "✅ Zeitzone gespeichert.",
        "help_text" => "Habitual hilft dir, Gewohnheiten mit Erinnerungen aufzubauen.\n\n\
            /add_habit - neue Gewohnheit anlegen\n\
            /my_habits - Gewohnheiten ansehen, bearbeiten, löschen\n\
            /today - heutige Erinnerungen\n\
            /progress - dein Gesamtfortschritt\n\
            /settings - Sprache und Zeitzone\n\
            /help - diese Nachricht",
        "cmd_start" => "Bot starten",
        "cmd_help" => "Was ich kann",
        "cmd_add_habit" => "Neue Gewohnheit anlegen",
        "cmd_my_habits" => "Deine Gewohnheiten",
        "cmd_today" => "Heutige Erinnerungen",
        "cmd_progress" => "Dein Fortschritt",
        "cmd_settings" => "Einstellungen",
        "cmd_language" => "Sprache ändern",
        "cmd_timezone" => "Zeitzone ändern",
        "settings_header" => "⚙️ Einstellungen",
        "btn_language" => "🌐 Sprache",
        "btn_timezone" => "🕒 Zeitzone",
        "my_habits_header" => "📋 Deine Gewohnheiten",
        "no_habits" => "Du hast noch keine Gewohnheiten. Lege mit /add_habit eine an.",
        "habit_deleted" => "🗑 Gewohnheit gelöscht.",
        "habit_not_found" => "Diese Gewohnheit gibt es nicht mehr.",
        "todays_header" => "📅 Heutige Erinnerungen. Tippe auf eine, wenn sie erledigt ist:",
        "no_notifications_today" => "Heute ist nichts geplant. 🎈",
        "any_time" => "jederzeit",
        "marked_done" => "✅ Als erledigt markiert",
        "wizard_create_header" => "🆕 Neue Gewohnheit",
        "wizard_edit_header" => "✏️ Gewohnheit bearbeiten",
        "field_name" => "Name",
        "field_description" => "Beschreibung",
        "field_times_per_day" => "Mal pro Tag",
        "field_start_date" => "Startdatum",
        "field_end_date" => "Enddatum",
        "field_recurrence" => "Wiederholung",
        "field_notifications" => "Erinnerungen",
        "prompt_name" => "Schick mir den Namen der Gewohnheit.",
        "prompt_description" => "Schick mir eine kurze Beschreibung.",
        "prompt_times_per_day" => "Wie oft pro Tag?",
        "prompt_start_date" => "Wann fängst du an? (heute, morgen, freitag, 2026-11-01 ...)",
        "prompt_end_date" => "Wann endet sie? (in 30 days, 31.12.2026 ...)",
        "prompt_recurrence" => "Wie oft wiederholt sie sich?",
        "prompt_days_weekly" => "Wähle die Wochentage und tippe auf Fertig.",
        "prompt_days_monthly" => "Wähle die Tage im Monat und tippe auf Fertig.",
        "prompt_notifications" => "Schick eine Uhrzeit wie 08:30. Tippe auf eine Zeit, um sie zu entfernen.",
        "err_name_taken" => "Du hast schon eine Gewohnheit mit diesem Namen.",
        "err_not_a_number" => "Bitte schick eine positive ganze Zahl.",
        "err_times_locked" => "Die Anzahl pro Tag folgt deinen Erinnerungen. Entferne Erinnerungen, um sie zu ändern.",
        "err_bad_date" => "Dieses Datum habe ich nicht verstanden.",
        "err_end_before_start" => "Das Enddatum darf nicht vor dem Startdatum liegen.",
        "err_bad_time" => "Diese Uhrzeit habe ich nicht verstanden. Versuche 08:30.",
        "err_use_buttons" => "Bitte nutze die Tasten unten.",
        "err_name_required" => "Gib der Gewohnheit zuerst einen Namen.",
        "rec_daily" => "Täglich",
        "rec_weekly" => "Wöchentlich",
        "rec_monthly" => "Monatlich",
        "wd_0" => "Mo",
        "wd_1" => "Di",
        "wd_2" => "Mi",
        "wd_3" => "Do",
        "wd_4" => "Fr",
        "wd_5" => "Sa",
        "wd_6" => "So",
        "your_habit" => "deine Gewohnheit",
        "tagline_0" => "Kleine Schritte jeden Tag summieren sich. 🌱",
        "tagline_1" => "Beständigkeit schlägt Intensität. 💪",
        "tagline_2" => "Du musst nicht perfekt sein, nur dranbleiben. 🚶",
        "tagline_3" => "Jedes Häkchen ist eine Stimme für die Person, die du sein willst. ✅",
        "tagline_4" => "Fortschritt statt Perfektion. ✨",
        _ => return None,
    })
}
