use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(1); // 1=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        0 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Sidebar ─────────────────────────────────────────
        "app.title" => "STL Viewer",
        "side.local" => if ru { "Локальный файл" } else { "Local File" },
        "side.view_local" => if ru { "Открыть локальный файл" } else { "View Local File" },
        "side.upload" => if ru { "Загрузка на сервер" } else { "Upload to Server" },
        "side.upload_files" => if ru { "Загрузить файлы" } else { "Upload Files" },
        "side.server_files" => if ru { "Файлы на сервере" } else { "Server Files" },
        "side.no_files" => if ru { "На сервере нет файлов." } else { "No files found on server." },
        "side.performance" => if ru { "Производительность" } else { "Performance" },
        "side.load_time" => if ru { "Время загрузки" } else { "Load Time" },
        "side.toggle" => if ru { "Показать/скрыть меню" } else { "Toggle Menu" },
        "side.language" => if ru { "English" } else { "Русский" },

        // ── Upload status ───────────────────────────────────
        "upload.in_flight" => if ru { "Загрузка…" } else { "Uploading…" },
        "upload.done" => if ru { "Загружено файлов" } else { "Uploaded files" },
        "upload.failed" => if ru { "Ошибка загрузки" } else { "Upload failed" },

        // ── Viewport ────────────────────────────────────────
        "view.empty" => if ru { "Модель не выбрана" } else { "No model selected" },
        "view.loading" => if ru { "Загрузка модели…" } else { "Loading model…" },
        "view.failed" => if ru { "Не удалось загрузить модель" } else { "Failed to load model" },

        // ── Dialogs ─────────────────────────────────────────
        "dlg.open_stl" => if ru { "Открыть STL" } else { "Open STL" },
        "dlg.upload_stl" => if ru { "Загрузить STL" } else { "Upload STL" },

        // ── Status bar ──────────────────────────────────────
        "status.files" => if ru { "Файлов" } else { "Files" },
        "status.local" => if ru { "локальный" } else { "local" },
        "status.remote" => if ru { "сервер" } else { "server" },
        "status.refreshing" => if ru { "обновление каталога" } else { "refreshing catalog" },
        "status.ready" => if ru { "Готово" } else { "Ready" },

        _ => "???",
    }
}
