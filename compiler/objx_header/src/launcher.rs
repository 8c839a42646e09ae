//! C launcher for executables whose entry point is a managed function.
//!
//! The stub links against the `objx_rt` static library and hands control
//! to `objx_run_main` together with the mangled entry symbol.

use objx_ir::ExportConfig;
use objx_mangle::mangle_entry;

/// Render the launcher translation unit for `config`'s entry point.
///
/// The entry symbol is bound through an asm label because `$` is not
/// portable in C identifiers. Asm labels skip the platform's user label
/// prefix, so the stub prepends `__USER_LABEL_PREFIX__` itself (`_` on
/// Mach-O, empty on ELF).
pub fn render_launcher(config: &ExportConfig) -> String {
    let symbol = mangle_entry(&config.entry_module, &config.entry_function);
    format!(
        "#include <stdint.h>\n\
         \n\
         typedef struct ObjxString {{\n\
         \x20   int64_t len;\n\
         \x20   const uint8_t *data;\n\
         }} ObjxString;\n\
         \n\
         typedef struct ObjxArray {{\n\
         \x20   int64_t len;\n\
         \x20   int64_t cap;\n\
         \x20   ObjxString *data;\n\
         }} ObjxArray;\n\
         \n\
         #define OBJX_STR_(x) #x\n\
         #define OBJX_STR(x) OBJX_STR_(x)\n\
         \n\
         extern void objx_entry(ObjxArray *args) __asm__(OBJX_STR(__USER_LABEL_PREFIX__) \"{symbol}\");\n\
         extern int objx_run_main(int argc, const char **argv, void (*entry)(ObjxArray *));\n\
         \n\
         int main(int argc, const char **argv) {{\n\
         \x20   return objx_run_main(argc, argv, objx_entry);\n\
         }}\n"
    )
}
