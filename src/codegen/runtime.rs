//! Emitted C prelude
//!
//! Fixed headers, the `h_string` alias, the string concatenation helper
//! that every translation unit carries, and the map runtime that is
//! emitted only when the program uses a map feature.

use super::Generator;

impl<'a> Generator<'a> {
    /// Headers, the `h_string` typedef, and `h_string_concat`. The
    /// concatenation result is never freed; the language has no
    /// deallocator for intermediate strings.
    pub(crate) fn write_prelude(&mut self) {
        self.write_line("#include <stdio.h>");
        self.write_line("#include <stdlib.h>");
        self.write_line("#include <string.h>");
        self.write_line("#include <stdbool.h>");
        self.write_line("");

        self.write_line("typedef char* h_string;");
        self.write_line("");

        self.write_line("h_string h_string_concat(h_string a, h_string b) {");
        self.indent();
        self.write_line("size_t len_a = strlen(a);");
        self.write_line("size_t len_b = strlen(b);");
        self.write_line("h_string result = (h_string)malloc(len_a + len_b + 1);");
        self.write_line("memcpy(result, a, len_a);");
        self.write_line("memcpy(result + len_a, b, len_b + 1);");
        self.write_line("return result;");
        self.dedent();
        self.write_line("}");
        self.write_line("");
    }

    /// The map runtime: a singly-linked list of string-keyed entries with a
    /// precomputed length. Keys are compared with `strcmp`; `h_map_set`
    /// overwrites on a key match and `h_map_delete` unlinks on one.
    pub(crate) fn write_map_runtime(&mut self) {
        self.write_line("typedef struct h_map_entry {");
        self.indent();
        self.write_line("char* key;");
        self.write_line("void* value;");
        self.write_line("struct h_map_entry* next;");
        self.dedent();
        self.write_line("} h_map_entry;");
        self.write_line("");

        self.write_line("typedef struct {");
        self.indent();
        self.write_line("h_map_entry* head;");
        self.write_line("int count;");
        self.dedent();
        self.write_line("} h_map;");
        self.write_line("");

        self.write_line("h_map* h_map_new() {");
        self.indent();
        self.write_line("h_map* m = (h_map*)malloc(sizeof(h_map));");
        self.write_line("m->head = NULL;");
        self.write_line("m->count = 0;");
        self.write_line("return m;");
        self.dedent();
        self.write_line("}");
        self.write_line("");

        self.write_line("void h_map_set(h_map* m, char* key, void* value) {");
        self.indent();
        self.write_line("h_map_entry* e = m->head;");
        self.write_line("while (e != NULL) {");
        self.indent();
        self.write_line("if (strcmp(e->key, key) == 0) {");
        self.indent();
        self.write_line("e->value = value;");
        self.write_line("return;");
        self.dedent();
        self.write_line("}");
        self.write_line("e = e->next;");
        self.dedent();
        self.write_line("}");
        self.write_line("e = (h_map_entry*)malloc(sizeof(h_map_entry));");
        self.write_line("e->key = key;");
        self.write_line("e->value = value;");
        self.write_line("e->next = m->head;");
        self.write_line("m->head = e;");
        self.write_line("m->count++;");
        self.dedent();
        self.write_line("}");
        self.write_line("");

        self.write_line("void* h_map_get(h_map* m, char* key) {");
        self.indent();
        self.write_line("h_map_entry* e = m->head;");
        self.write_line("while (e != NULL) {");
        self.indent();
        self.write_line("if (strcmp(e->key, key) == 0) {");
        self.indent();
        self.write_line("return e->value;");
        self.dedent();
        self.write_line("}");
        self.write_line("e = e->next;");
        self.dedent();
        self.write_line("}");
        self.write_line("return NULL;");
        self.dedent();
        self.write_line("}");
        self.write_line("");

        self.write_line("void h_map_delete(h_map* m, char* key) {");
        self.indent();
        self.write_line("h_map_entry** cur = &m->head;");
        self.write_line("while (*cur != NULL) {");
        self.indent();
        self.write_line("if (strcmp((*cur)->key, key) == 0) {");
        self.indent();
        self.write_line("h_map_entry* dead = *cur;");
        self.write_line("*cur = dead->next;");
        self.write_line("free(dead);");
        self.write_line("m->count--;");
        self.write_line("return;");
        self.dedent();
        self.write_line("}");
        self.write_line("cur = &(*cur)->next;");
        self.dedent();
        self.write_line("}");
        self.dedent();
        self.write_line("}");
        self.write_line("");

        self.write_line("int h_map_len(h_map* m) {");
        self.indent();
        self.write_line("return m->count;");
        self.dedent();
        self.write_line("}");
        self.write_line("");

        self.write_line("void h_map_free(h_map* m) {");
        self.indent();
        self.write_line("h_map_entry* e = m->head;");
        self.write_line("while (e != NULL) {");
        self.indent();
        self.write_line("h_map_entry* next = e->next;");
        self.write_line("free(e);");
        self.write_line("e = next;");
        self.dedent();
        self.write_line("}");
        self.write_line("free(m);");
        self.dedent();
        self.write_line("}");
        self.write_line("");
    }
}
